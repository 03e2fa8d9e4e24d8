//! Bilingual (Arabic/French) string catalog.
//!
//! Every user-facing string is looked up through [`tr`] with a typed key,
//! so missing translations are compile errors rather than runtime holes.
//! Arabic is the default language.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{ApplicationStatus, DocumentCategory};

/// Active UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    Fr,
}

impl Language {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ar => "ar",
            Self::Fr => "fr",
        }
    }

    /// BCP-47 locale used as the speech synthesis hint.
    pub const fn locale(self) -> &'static str {
        match self {
            Self::Ar => "ar-SA",
            Self::Fr => "fr-FR",
        }
    }

    /// Parse a language code, tolerant of region tags (`ar-SA`, `fr_FR`).
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.split(['-', '_']).next().unwrap_or("") {
            "ar" => Some(Self::Ar),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Ar => Self::Fr,
            Self::Fr => Self::Ar,
        }
    }
}

/// Typed catalog keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AppTitle,
    ChooseRole,
    FarmerRole,
    BankerRole,
    ChooseSolution,
    SolutionOneTitle,
    SolutionTwoTitle,
    SolutionOneBadge,
    SolutionTwoBadge,
    GetStarted,
    LoginTitle,
    Email,
    FullName,
    CinLabel,
    LoginButton,
    Logout,
    FarmerDashboardTitle,
    BankerDashboardTitle,
    NormalBank,
    IslamicBank,
    SelectBankType,
    FarmersFolders,
    NoApplications,
    PersonalInformation,
    NameLabel,
    Documents,
    AddFile,
    SubmitApplication,
    Approve,
    Reject,
    StatusPending,
    StatusApproved,
    StatusRejected,
    ApplicationStatusTitle,
    NoApplicationYet,
    WelcomeBack,
    ChatTitle,
    ChatOnline,
    ChatPlaceholder,
    FrequentQuestions,
    ReadAloud,
    StopReading,
    SpeechUnavailable,
    SpeechFailed,
    RequiredField,
    InvalidEmail,
    NotFoundNotice,
    AlreadyDecidedNotice,
    BackToHome,
    LoggedInAs,
    HelpLanguage,
    HelpQuit,
    HelpRead,
    HelpChat,
    HelpBack,
    HelpSelect,
    HelpNavigate,
    FileAdded,
    FileNotFound,
    SubmittedNotice,
}

/// Look up a catalog string.
pub const fn tr(lang: Language, text: Text) -> &'static str {
    use Language::{Ar, Fr};
    match (text, lang) {
        (Text::AppTitle, Ar) => "التمويل الفلاحي",
        (Text::AppTitle, Fr) => "Financement Agricole",
        (Text::ChooseRole, Ar) => "اختر دورك",
        (Text::ChooseRole, Fr) => "Choisissez votre rôle",
        (Text::FarmerRole, Ar) => "فلاح",
        (Text::FarmerRole, Fr) => "Agriculteur",
        (Text::BankerRole, Ar) => "موظف بنك",
        (Text::BankerRole, Fr) => "Banquier",
        (Text::ChooseSolution, Ar) => "اختر الحل المناسب",
        (Text::ChooseSolution, Fr) => "Choisissez votre solution",
        (Text::SolutionOneTitle, Ar) => "تنظيم أوراق الأرض والحصول على قرض",
        (Text::SolutionOneTitle, Fr) => {
            "Régularisation des papiers de terrain et obtention d'un prêt"
        }
        (Text::SolutionTwoTitle, Ar) => "طلب معدات من البنك الإسلامي",
        (Text::SolutionTwoTitle, Fr) => {
            "Demande d'équipements auprès de la banque islamique"
        }
        (Text::SolutionOneBadge, Ar) => "الحل الأول",
        (Text::SolutionOneBadge, Fr) => "Solution 1",
        (Text::SolutionTwoBadge, Ar) => "الحل الثاني",
        (Text::SolutionTwoBadge, Fr) => "Solution 2",
        (Text::GetStarted, Ar) => "ابدأ الآن",
        (Text::GetStarted, Fr) => "Commencer",
        (Text::LoginTitle, Ar) => "تسجيل الدخول",
        (Text::LoginTitle, Fr) => "Connexion",
        (Text::Email, Ar) => "البريد الإلكتروني",
        (Text::Email, Fr) => "E-mail",
        (Text::FullName, Ar) => "الاسم الكامل",
        (Text::FullName, Fr) => "Nom complet",
        (Text::CinLabel, Ar) => "بطاقة التعريف الوطنية",
        (Text::CinLabel, Fr) => "Carte d'identité nationale (CIN)",
        (Text::LoginButton, Ar) => "دخول",
        (Text::LoginButton, Fr) => "Se connecter",
        (Text::Logout, Ar) => "تسجيل الخروج",
        (Text::Logout, Fr) => "Déconnexion",
        (Text::FarmerDashboardTitle, Ar) => "لوحة تحكم الفلاح",
        (Text::FarmerDashboardTitle, Fr) => "Tableau de bord agriculteur",
        (Text::BankerDashboardTitle, Ar) => "لوحة تحكم البنك",
        (Text::BankerDashboardTitle, Fr) => "Tableau de bord banquier",
        (Text::NormalBank, Ar) => "البنك العادي",
        (Text::NormalBank, Fr) => "Banque classique",
        (Text::IslamicBank, Ar) => "البنك الإسلامي",
        (Text::IslamicBank, Fr) => "Banque islamique",
        (Text::SelectBankType, Ar) => "اختر نوع البنك",
        (Text::SelectBankType, Fr) => "Sélectionnez le type de banque",
        (Text::FarmersFolders, Ar) => "ملفات الفلاحين",
        (Text::FarmersFolders, Fr) => "Dossiers des agriculteurs",
        (Text::NoApplications, Ar) => "لا توجد طلبات حالياً",
        (Text::NoApplications, Fr) => "Aucune demande pour le moment",
        (Text::PersonalInformation, Ar) => "المعلومات الشخصية",
        (Text::PersonalInformation, Fr) => "Informations personnelles",
        (Text::NameLabel, Ar) => "الاسم",
        (Text::NameLabel, Fr) => "Nom",
        (Text::Documents, Ar) => "الوثائق",
        (Text::Documents, Fr) => "Documents",
        (Text::AddFile, Ar) => "إضافة ملف",
        (Text::AddFile, Fr) => "Ajouter un fichier",
        (Text::SubmitApplication, Ar) => "إرسال الطلب",
        (Text::SubmitApplication, Fr) => "Envoyer la demande",
        (Text::Approve, Ar) => "موافقة",
        (Text::Approve, Fr) => "Approuver",
        (Text::Reject, Ar) => "رفض",
        (Text::Reject, Fr) => "Rejeter",
        (Text::StatusPending, Ar) => "قيد الانتظار",
        (Text::StatusPending, Fr) => "En attente",
        (Text::StatusApproved, Ar) => "تمت الموافقة",
        (Text::StatusApproved, Fr) => "Approuvée",
        (Text::StatusRejected, Ar) => "مرفوض",
        (Text::StatusRejected, Fr) => "Rejetée",
        (Text::ApplicationStatusTitle, Ar) => "حالة الطلب",
        (Text::ApplicationStatusTitle, Fr) => "Statut de la demande",
        (Text::NoApplicationYet, Ar) => "لم يتم إرسال أي طلب بعد",
        (Text::NoApplicationYet, Fr) => "Aucune demande envoyée pour le moment",
        (Text::WelcomeBack, Ar) => "مرحباً بعودتك",
        (Text::WelcomeBack, Fr) => "Bon retour",
        (Text::ChatTitle, Ar) => "المحامي القانوني",
        (Text::ChatTitle, Fr) => "Avocat juridique",
        (Text::ChatOnline, Ar) => "متصل الآن",
        (Text::ChatOnline, Fr) => "En ligne",
        (Text::ChatPlaceholder, Ar) => "اكتب سؤالك هنا...",
        (Text::ChatPlaceholder, Fr) => "Tapez votre question ici...",
        (Text::FrequentQuestions, Ar) => "أسئلة شائعة:",
        (Text::FrequentQuestions, Fr) => "Questions fréquentes :",
        (Text::ReadAloud, Ar) => "قراءة كل النص",
        (Text::ReadAloud, Fr) => "Lire tout",
        (Text::StopReading, Ar) => "إيقاف",
        (Text::StopReading, Fr) => "Arrêter",
        (Text::SpeechUnavailable, Ar) => "ميزة القراءة الصوتية غير متاحة على هذا الجهاز",
        (Text::SpeechUnavailable, Fr) => {
            "La lecture vocale n'est pas disponible sur cet appareil"
        }
        (Text::SpeechFailed, Ar) => "لا يمكن قراءة النص - لا توجد أصوات مثبتة لهذه اللغة",
        (Text::SpeechFailed, Fr) => {
            "Impossible de lire le texte - aucune voix installée pour cette langue"
        }
        (Text::RequiredField, Ar) => "حقل مطلوب",
        (Text::RequiredField, Fr) => "Champ requis",
        (Text::InvalidEmail, Ar) => "البريد الإلكتروني غير صحيح",
        (Text::InvalidEmail, Fr) => "E-mail invalide",
        (Text::NotFoundNotice, Ar) => "الطلب غير موجود",
        (Text::NotFoundNotice, Fr) => "Demande introuvable",
        (Text::AlreadyDecidedNotice, Ar) => "تم البت في هذا الطلب مسبقاً",
        (Text::AlreadyDecidedNotice, Fr) => "Cette demande a déjà été tranchée",
        (Text::BackToHome, Ar) => "العودة إلى الرئيسية",
        (Text::BackToHome, Fr) => "Retour à l'accueil",
        (Text::LoggedInAs, Ar) => "مسجل الدخول",
        (Text::LoggedInAs, Fr) => "Connecté",
        (Text::HelpLanguage, Ar) => "اللغة",
        (Text::HelpLanguage, Fr) => "Langue",
        (Text::HelpQuit, Ar) => "خروج",
        (Text::HelpQuit, Fr) => "Quitter",
        (Text::HelpRead, Ar) => "قراءة",
        (Text::HelpRead, Fr) => "Lecture",
        (Text::HelpChat, Ar) => "المحامي",
        (Text::HelpChat, Fr) => "Avocat",
        (Text::HelpBack, Ar) => "رجوع",
        (Text::HelpBack, Fr) => "Retour",
        (Text::HelpSelect, Ar) => "اختيار",
        (Text::HelpSelect, Fr) => "Valider",
        (Text::HelpNavigate, Ar) => "تنقل",
        (Text::HelpNavigate, Fr) => "Naviguer",
        (Text::FileAdded, Ar) => "تمت إضافة الملف",
        (Text::FileAdded, Fr) => "Fichier ajouté",
        (Text::FileNotFound, Ar) => "الملف غير موجود",
        (Text::FileNotFound, Fr) => "Fichier introuvable",
        (Text::SubmittedNotice, Ar) => "تم إرسال الطلب",
        (Text::SubmittedNotice, Fr) => "Demande envoyée",
    }
}

/// Localized label for a review status.
pub const fn status_label(lang: Language, status: ApplicationStatus) -> &'static str {
    match status {
        ApplicationStatus::Pending => tr(lang, Text::StatusPending),
        ApplicationStatus::Approved => tr(lang, Text::StatusApproved),
        ApplicationStatus::Rejected => tr(lang, Text::StatusRejected),
    }
}

/// Localized label for a document category.
pub const fn category_label(lang: Language, category: DocumentCategory) -> &'static str {
    use Language::{Ar, Fr};
    match (category, lang) {
        (DocumentCategory::Cin, Ar) => "بطاقة التعريف",
        (DocumentCategory::Cin, Fr) => "CIN",
        (DocumentCategory::LandPapers, Ar) => "أوراق الأرض",
        (DocumentCategory::LandPapers, Fr) => "Papiers de terrain",
        (DocumentCategory::ProofOfExploitation, Ar) => "إثبات الاستغلال",
        (DocumentCategory::ProofOfExploitation, Fr) => "Preuve d'exploitation",
        (DocumentCategory::ExpertReport, Ar) => "تقرير الخبير",
        (DocumentCategory::ExpertReport, Fr) => "Rapport d'expert",
    }
}

/// Localized label for a validation field key.
pub fn field_label(lang: Language, field: &str) -> &'static str {
    if let Some(category) = DocumentCategory::parse(field) {
        return category_label(lang, category);
    }
    match field {
        "farmer_email" => tr(lang, Text::Email),
        "farmer_name" => tr(lang, Text::FullName),
        "cin" => tr(lang, Text::CinLabel),
        _ => field_fallback(lang),
    }
}

const fn field_fallback(lang: Language) -> &'static str {
    tr(lang, Text::RequiredField)
}

/// Localized user-facing message for a core error.
pub fn error_message(lang: Language, error: &Error) -> String {
    match error {
        Error::Validation { field } => {
            format!("{}: {}", tr(lang, Text::RequiredField), field_label(lang, field))
        }
        Error::NotFound { .. } => tr(lang, Text::NotFoundNotice).to_string(),
        Error::TerminalStatus { status, .. } => format!(
            "{} ({})",
            tr(lang, Text::AlreadyDecidedNotice),
            status_label(lang, *status)
        ),
        other => other.to_string(),
    }
}
