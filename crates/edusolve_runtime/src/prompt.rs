//! Request composition: the fixed output contract and the ordered parts.

use edusolve_core::document::{EXPLANATION_END, EXPLANATION_START};
use edusolve_core::file::{is_supported_media_type, normalized_media_type};
use edusolve_core::UploadedFile;
use edusolve_llms::{ContentPart, GenerateRequest, Message};

/// Text part placed after the course documents.
pub const CONTEXT_MARKER: &str =
    "CONTEXTE (Supports de cours) : Voici les documents pédagogiques de référence.";

/// Text part closing the request, after the exercise.
pub const INSTRUCTION_MARKER: &str = "ÉNONCÉ À RÉSOUDRE : Analyse cet exercice et produis la réponse structurée avec solution puis explications point par point.";

/// Output contract the response parser relies on.
pub fn system_instruction() -> String {
    format!(
        "Tu es un expert en pédagogie et un ingénieur senior en développement web.
Ta mission est de résoudre l'exercice fourni en te basant RIGOUREUSEMENT sur les documents de cours attachés.

RÈGLES CRUCIALES DE RÉPONSE (À RESPECTER SCRUPULEUSEMENT) :

1. LANGUE :
   - Détecte la langue de l'énoncé de l'exercice.
   - La section \"# 1. Solution\" doit être rédigée INTÉGRALEMENT dans la même langue que l'exercice.
   - La section \"# 2. Explications détaillées\" doit être rédigée en français.

2. STRUCTURE ET SÉPARATION :
   - Ne mélange JAMAIS les explications avec la résolution.
   - # 1. Solution : Donne la résolution directe et propre. Suis la numérotation et l'ordre de l'exercice original.
   - Chaque question commence par un titre de la forme \"## Question N\".
   - Juste après la réponse à une question, place son explication entre les balises {start} et {end}, chacune seule sur sa ligne.
   - # 2. Explications détaillées : Pour CHAQUE question ou tâche résolue dans la première section, fournis une explication pédagogique dédiée, L'UNE APRÈS L'AUTRE, en suivant le même ordre.

3. CONTENU DES EXPLICATIONS :
   - Pour chaque question, explique la logique de la réponse.
   - Fais le lien avec les concepts spécifiques mentionnés dans les cours fournis.
   - Si c'est du développement web, explique les bonnes pratiques ou la syntaxe utilisée.",
        start = EXPLANATION_START,
        end = EXPLANATION_END,
    )
}

/// Footnote citing course files that could not be attached.
pub fn unread_footnote(names: &[String]) -> String {
    format!(
        "Note : Des fichiers Word/PPTX comme {} ont été fournis. Signale brièvement dans la section explicative que leur contenu binaire n'a pu être lu directement et suggère le format PDF pour les prochaines fois.",
        names.join(", ")
    )
}

/// System instruction of the follow-up chat, grounded in the correction.
pub fn chat_instruction(solution_text: &str) -> String {
    format!(
        "Tu es un tuteur bienveillant. L'étudiant vient de recevoir la correction ci-dessous pour son exercice. \
Réponds à ses questions de suivi en français, de façon concise et pédagogique, en t'appuyant sur cette correction.

CORRECTION :
{}",
        solution_text
    )
}

/// A request ready to be sent: system instruction plus ordered parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedRequest {
    pub system_instruction: String,
    pub parts: Vec<ContentPart>,
    /// Course files left out because of their media type
    pub unread_courses: Vec<String>,
    /// False when the exercise itself was left out
    pub exercise_attached: bool,
}

impl ComposedRequest {
    pub fn into_request(self, model: impl Into<String>, temperature: f32) -> GenerateRequest {
        GenerateRequest::new(model, vec![Message::user(self.parts)])
            .with_system_instruction(self.system_instruction)
            .with_temperature(temperature)
    }
}

fn inline_part(file: &UploadedFile) -> ContentPart {
    ContentPart::inline_data(normalized_media_type(&file.media_type), file.payload())
}

/// Build the request for one solve cycle.
///
/// Part order: supported courses, context marker, the exercise when its type
/// is supported, instruction marker. Unsupported exercises are dropped
/// silently; unsupported courses are dropped and named in a footnote.
pub fn compose(courses: &[UploadedFile], exercise: &UploadedFile) -> ComposedRequest {
    let (supported, unsupported): (Vec<&UploadedFile>, Vec<&UploadedFile>) =
        courses.iter().partition(|f| f.is_supported());

    let mut parts: Vec<ContentPart> = supported.into_iter().map(inline_part).collect();
    parts.push(ContentPart::text(CONTEXT_MARKER));

    let exercise_attached = is_supported_media_type(&exercise.media_type);
    if exercise_attached {
        parts.push(inline_part(exercise));
    }
    parts.push(ContentPart::text(INSTRUCTION_MARKER));

    let unread_courses: Vec<String> = unsupported.iter().map(|f| f.name.clone()).collect();
    let mut instruction = system_instruction();
    if !unread_courses.is_empty() {
        instruction.push_str("\n\n");
        instruction.push_str(&unread_footnote(&unread_courses));
    }

    ComposedRequest {
        system_instruction: instruction,
        parts,
        unread_courses,
        exercise_attached,
    }
}
