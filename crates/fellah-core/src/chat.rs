//! Scripted legal-advisor chat.
//!
//! A static exact-match question -> answer table per (language, track),
//! plus a localized fallback for anything else. No fuzzy matching, no
//! state; the transcript lives in the UI.

use crate::i18n::Language;
use crate::model::Solution;

/// The five standard question/answer pairs for one language and track.
type QaTable = [(&'static str, &'static str); 5];

const LAND_LOAN_AR: QaTable = [
    (
        "ما هي الوثائق المطلوبة للحصول على قرض؟",
        "الوثائق المطلوبة تشمل: بطاقة التعريف الوطنية (CIN)، أوراق الأرض، تقرير الخبير، وإثبات استغلال الأرض. يجب أن تكون جميع الوثائق مصدقة ومحدثة.",
    ),
    (
        "كم يستغرق وقت معالجة الطلب؟",
        "عادة ما يستغرق معالجة الطلب من 15 إلى 30 يوم عمل. يعتمد الوقت على اكتمال الوثائق ومراجعة البنك.",
    ),
    (
        "ما هي تكلفة الخدمات القانونية؟",
        "تكلفة الخدمات القانونية تتراوح بين 200 و 500 دينار تونسي حسب تعقيد الملف. يمكننا مناقشة التفاصيل عند استكمال الوثائق.",
    ),
    (
        "هل يمكنني متابعة حالة طلبي؟",
        "نعم، يمكنك متابعة حالة طلبك من خلال لوحة التحكم. ستتلقى إشعارات عند تحديث الحالة.",
    ),
    (
        "ما هي شروط الحصول على القرض؟",
        "الشروط الأساسية: امتلاك أرض مسجلة قانونياً، تقرير خبير يثبت قيمة الأرض، إثبات استغلال الأرض لمدة لا تقل عن 3 سنوات، وملف كامل من الوثائق.",
    ),
];

const LAND_LOAN_FR: QaTable = [
    (
        "Quels documents sont requis pour obtenir un prêt ?",
        "Les documents requis comprennent : la carte d'identité nationale (CIN), les papiers de terrain, le rapport d'expert et la preuve d'exploitation du terrain. Tous les documents doivent être certifiés et à jour.",
    ),
    (
        "Combien de temps prend le traitement de la demande ?",
        "Le traitement de la demande prend généralement entre 15 et 30 jours ouvrables. Le temps dépend de la complétude des documents et de l'examen par la banque.",
    ),
    (
        "Quel est le coût des services juridiques ?",
        "Le coût des services juridiques varie entre 200 et 500 dinars tunisiens selon la complexité du dossier. Nous pouvons discuter des détails une fois les documents complétés.",
    ),
    (
        "Puis-je suivre l'état de ma demande ?",
        "Oui, vous pouvez suivre l'état de votre demande via le tableau de bord. Vous recevrez des notifications lors des mises à jour de statut.",
    ),
    (
        "Quelles sont les conditions pour obtenir le prêt ?",
        "Les conditions de base : posséder un terrain enregistré légalement, un rapport d'expert prouvant la valeur du terrain, une preuve d'exploitation du terrain pendant au moins 3 ans, et un dossier complet de documents.",
    ),
];

const EQUIPMENT_AR: QaTable = [
    (
        "ما هي المعدات المتاحة من البنك الإسلامي؟",
        "البنك الإسلامي يوفر أنواعاً مختلفة من المعدات الزراعية مثل: الجرارات، مضخات المياه، معدات الري، والحصادات. يمكنك اختيار المعدات المناسبة لاحتياجاتك.",
    ),
    (
        "كم يستغرق وقت الموافقة على طلب المعدات؟",
        "عادة ما يستغرق الحصول على الموافقة من 10 إلى 20 يوم عمل. يعتمد الوقت على نوع المعدات المطلوبة واكتمال الوثائق.",
    ),
    (
        "ما هي الشروط للحصول على المعدات؟",
        "الشروط الأساسية: امتلاك أرض زراعية، تقديم الوثائق المطلوبة (CIN وأوراق الأرض)، وملف كامل من الوثائق. يجب أن تكون الأرض قابلة للاستغلال الزراعي.",
    ),
    (
        "هل يمكنني طلب أكثر من نوع معدات؟",
        "نعم، يمكنك طلب أكثر من نوع معدات في نفس الطلب. لكن يجب أن تبرر الحاجة لكل نوع من المعدات في طلبك.",
    ),
    (
        "ما هي الوثائق المطلوبة لطلب المعدات؟",
        "الوثائق المطلوبة: بطاقة التعريف الوطنية (CIN)، أوراق الأرض، ووثائق طلب المعدات. يجب أن تكون جميع الوثائق مصدقة ومحدثة.",
    ),
];

const EQUIPMENT_FR: QaTable = [
    (
        "Quels équipements sont disponibles auprès de la banque islamique ?",
        "La banque islamique propose différents types d'équipements agricoles tels que : tracteurs, pompes à eau, équipements d'irrigation et moissonneuses. Vous pouvez choisir les équipements adaptés à vos besoins.",
    ),
    (
        "Combien de temps prend l'approbation de la demande d'équipements ?",
        "L'obtention de l'approbation prend généralement entre 10 et 20 jours ouvrables. Le temps dépend du type d'équipement demandé et de la complétude des documents.",
    ),
    (
        "Quelles sont les conditions pour obtenir les équipements ?",
        "Les conditions de base : posséder un terrain agricole, fournir les documents requis (CIN et papiers de terrain), et un dossier complet de documents. Le terrain doit être exploitable agricolement.",
    ),
    (
        "Puis-je demander plus d'un type d'équipement ?",
        "Oui, vous pouvez demander plus d'un type d'équipement dans la même demande. Cependant, vous devez justifier le besoin de chaque type d'équipement dans votre demande.",
    ),
    (
        "Quels documents sont requis pour la demande d'équipements ?",
        "Les documents requis : carte d'identité nationale (CIN), papiers de terrain et documents de demande d'équipements. Tous les documents doivent être certifiés et à jour.",
    ),
];

const fn table(lang: Language, solution: Solution) -> &'static QaTable {
    match (lang, solution) {
        (Language::Ar, Solution::LandLoan) => &LAND_LOAN_AR,
        (Language::Fr, Solution::LandLoan) => &LAND_LOAN_FR,
        (Language::Ar, Solution::Equipment) => &EQUIPMENT_AR,
        (Language::Fr, Solution::Equipment) => &EQUIPMENT_FR,
    }
}

/// The advisor's opening message for a track.
pub const fn welcome(lang: Language, solution: Solution) -> &'static str {
    match (lang, solution) {
        (Language::Ar, Solution::LandLoan) => {
            "مرحباً! أنا محامٍ متخصص في تنظيم الأوراق العقارية. كيف يمكنني مساعدتك اليوم؟"
        }
        (Language::Fr, Solution::LandLoan) => {
            "Bonjour ! Je suis un avocat spécialisé dans la régularisation des documents fonciers. Comment puis-je vous aider aujourd'hui ?"
        }
        (Language::Ar, Solution::Equipment) => {
            "مرحباً! أنا محامٍ متخصص في طلبات المعدات من البنوك الإسلامية. كيف يمكنني مساعدتك اليوم؟"
        }
        (Language::Fr, Solution::Equipment) => {
            "Bonjour ! Je suis un avocat spécialisé dans les demandes d'équipements auprès des banques islamiques. Comment puis-je vous aider aujourd'hui ?"
        }
    }
}

/// Fallback answer when no question matches exactly.
pub const fn fallback(lang: Language) -> &'static str {
    match lang {
        Language::Ar => {
            "شكراً لسؤالك. يرجى الاتصال بنا مباشرة للحصول على معلومات أكثر تفصيلاً."
        }
        Language::Fr => {
            "Merci pour votre question. Veuillez nous contacter directement pour plus de détails."
        }
    }
}

/// The standard questions offered as quick picks for one track.
pub fn standard_questions(lang: Language, solution: Solution) -> Vec<&'static str> {
    table(lang, solution).iter().map(|(q, _)| *q).collect()
}

/// Answer a question by exact match against both tracks' tables for the
/// language, falling back to the generic localized answer.
pub fn answer(lang: Language, question: &str) -> &'static str {
    let question = question.trim();
    for solution in [Solution::LandLoan, Solution::Equipment] {
        for (q, a) in table(lang, solution) {
            if *q == question {
                return a;
            }
        }
    }
    fallback(lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_returns_the_scripted_answer() {
        let answer = answer(Language::Fr, "Quel est le coût des services juridiques ?");
        assert!(answer.contains("200 et 500 dinars"));
    }

    #[test]
    fn match_is_exact_not_fuzzy() {
        assert_eq!(
            answer(Language::Fr, "quel est le coût des services juridiques ?"),
            fallback(Language::Fr)
        );
        assert_eq!(answer(Language::Ar, "سؤال غير معروف"), fallback(Language::Ar));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let padded = "  ما هي الوثائق المطلوبة للحصول على قرض؟ ";
        assert_ne!(answer(Language::Ar, padded), fallback(Language::Ar));
    }

    #[test]
    fn both_tracks_are_answerable_regardless_of_context() {
        // A farmer on track 1 can still ask a track 2 question.
        let q = "Puis-je demander plus d'un type d'équipement ?";
        assert!(answer(Language::Fr, q).contains("justifier"));
    }

    #[test]
    fn five_standard_questions_per_track_and_language() {
        for lang in [Language::Ar, Language::Fr] {
            for solution in [Solution::LandLoan, Solution::Equipment] {
                assert_eq!(standard_questions(lang, solution).len(), 5);
            }
        }
    }

    #[test]
    fn welcome_is_track_specific() {
        assert_ne!(
            welcome(Language::Ar, Solution::LandLoan),
            welcome(Language::Ar, Solution::Equipment)
        );
    }
}
