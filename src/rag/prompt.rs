//! Prompt construction for the restaurant assistant.

use crate::types::{ChatMessage, SearchResult};
use crate::utils::toml_config::AssistantConfig;

/// Fixed answer returned when generation fails.
pub const APOLOGY_ANSWER: &str =
    "Lo siento, hubo un error al procesar tu pregunta. Por favor intenta de nuevo";

/// System and user templates, rendered once from the assistant persona.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplates {
    system: String,
    contact: String,
}

impl PromptTemplates {
    pub fn new(assistant: &AssistantConfig) -> Self {
        let system = assistant
            .system_prompt
            .clone()
            .unwrap_or_else(|| default_system_prompt(assistant));

        Self {
            system,
            contact: format!("WhatsApp: {}", assistant.contact_phone),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system
    }

    /// Contact line offered when nothing relevant was found.
    pub fn contact_line(&self) -> &str {
        &self.contact
    }

    /// `[system, user]`; the user message depends on whether any context
    /// was retrieved.
    pub fn build_prompt(&self, query: &str, context: &str) -> Vec<ChatMessage> {
        let user = if context.is_empty() {
            self.no_context_message(query)
        } else {
            format!(
                "Usa la siguiente información para responder la pregunta del usuario.\n\n\
                 INFORMACIÓN DISPONIBLE:\n{context}\n\n\
                 PREGUNTA DEL USUARIO:\n{query}\n\n\
                 INSTRUCCIONES:\n\
                 - Responde basándote SOLO en la información proporcionada\n\
                 - Si la respuesta no está en la información, di \"No tengo esa información disponible\"\n\
                 - Sé conciso y directo\n\
                 - Usa formato amigable (sin listas numeradas innecesarias)"
            )
        };

        vec![ChatMessage::system(self.system.clone()), ChatMessage::user(user)]
    }

    /// Body of the user message when retrieval came back empty. Also used as
    /// the direct answer when generation is skipped.
    pub fn no_context_message(&self, query: &str) -> String {
        format!(
            "No encontré información específica para responder tu pregunta.\n\n\
             PREGUNTA:\n{query}\n\n\
             Por favor, intenta reformular tu pregunta o contacta directamente al restaurante:\n{}",
            self.contact
        )
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::new(&AssistantConfig::default())
    }
}

fn default_system_prompt(assistant: &AssistantConfig) -> String {
    let name = &assistant.restaurant_name;
    let city = &assistant.city;
    let phone = &assistant.contact_phone;

    format!(
        "Eres un asistente virtual del Restaurante \"{name}\" en {city}.\n\n\
         Tu trabajo es ayudar a los clientes respondiendo preguntas sobre:\n\
         - Menú y precios\n\
         - Horarios de atención\n\
         - Servicio de domicilios\n\
         - Reservas\n\
         - Políticas del restaurante\n\
         - Ubicación y contacto\n\n\
         INSTRUCCIONES IMPORTANTES:\n\
         - Sé amable, profesional y conciso\n\
         - Usa el contexto proporcionado para responder\n\
         - Si no tienes información, di \"No tengo esa información, pero puedes contactarnos al {phone}\"\n\
         - Usa pesos colombianos (COP) para precios\n\
         - Si el cliente quiere hacer un pedido o reserva, dile que te contacte por WhatsApp: {phone}\n\
         - Nunca inventes información que no esté en el contexto\n\n\
         Mantén un tono amigable y cercano, como un mesero experimentado."
    )
}

/// Numbered context blocks, `""` when there is nothing to show.
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("Document {} ({}):\n{}", i + 1, r.source, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;

    fn result(source: &str, content: &str) -> SearchResult {
        SearchResult {
            content: content.to_string(),
            source: source.to_string(),
            chunk_index: 0,
            distance: 0.1,
        }
    }

    #[test]
    fn test_build_context_empty() {
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_build_context_numbered_blocks() {
        let context = build_context(&[
            result("menu.txt", "Ajiaco cuesta $12.000"),
            result("horarios.txt", "Abrimos a las 11:00"),
        ]);
        assert_eq!(
            context,
            "Document 1 (menu.txt):\nAjiaco cuesta $12.000\n\n\
             Document 2 (horarios.txt):\nAbrimos a las 11:00"
        );
    }

    #[test]
    fn test_prompt_with_context() {
        let templates = PromptTemplates::default();
        let messages = templates.build_prompt("¿Cuánto cuesta el ajiaco?", "Document 1 (menu.txt):\nAjiaco");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0].content.contains("El Buen Sabor"));
        assert!(messages[0].content.contains("Bogotá"));
        assert!(messages[0].content.contains("Nunca inventes"));
        assert_eq!(messages[1].role, MessageRole::User);
        assert!(messages[1].content.contains("INFORMACIÓN DISPONIBLE:\nDocument 1"));
        assert!(messages[1].content.contains("¿Cuánto cuesta el ajiaco?"));
        assert!(messages[1].content.contains("SOLO en la información"));
    }

    #[test]
    fn test_prompt_without_context_points_to_contact() {
        let templates = PromptTemplates::default();
        let messages = templates.build_prompt("¿Tienen parqueadero?", "");
        let user = &messages[1].content;

        assert!(user.starts_with("No encontré información específica"));
        assert!(user.contains("¿Tienen parqueadero?"));
        assert!(user.contains("WhatsApp: 300-123-4567"));
        assert!(!user.contains("INFORMACIÓN DISPONIBLE"));
    }

    #[test]
    fn test_custom_persona_and_override() {
        let assistant = AssistantConfig {
            restaurant_name: "La Fonda".to_string(),
            city: "Medellín, Colombia".to_string(),
            contact_phone: "311-000-0000".to_string(),
            system_prompt: None,
        };
        let templates = PromptTemplates::new(&assistant);
        assert!(templates.system_prompt().contains("\"La Fonda\" en Medellín"));
        assert!(templates.system_prompt().contains("311-000-0000"));
        assert_eq!(templates.contact_line(), "WhatsApp: 311-000-0000");

        let overridden = PromptTemplates::new(&AssistantConfig {
            system_prompt: Some("Eres un bot.".to_string()),
            ..assistant
        });
        assert_eq!(overridden.system_prompt(), "Eres un bot.");
    }
}
