//! System prompt rendered from the configured interview sources.

use std::path::Path;

use novainfor_shared::SourceConfig;

const PREAMBLE: &str = "Eres un asistente virtual experto en orientación académica para \
estudiantes de Ingeniería Informática.\n\
Basándote en la información de los siguientes archivos:";

const RULES: &str = "**Reglas importantes:**
1. Solo utiliza la información contenida en estos archivos. Si no tienes datos suficientes, responde que no hay información disponible.
2. Proporciona respuestas claras y concisas basadas únicamente en los datos.
3. Personaliza las respuestas según las necesidades del usuario, utilizando ejemplos relevantes.
4. Nunca combines información de profesores diferentes sin indicación explícita del usuario.";

/// Build the system prompt listing every source by file name.
pub fn system_prompt(sources: &[SourceConfig]) -> String {
    let mut prompt = String::from(PREAMBLE);
    prompt.push('\n');

    for source in sources {
        let name = Path::new(&source.path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source.path.clone());
        prompt.push_str(&format!("- {name}: {}\n", source.description.trim()));
    }

    prompt.push('\n');
    prompt.push_str(RULES);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use novainfor_shared::AppConfig;

    #[test]
    fn lists_every_source_with_description() {
        let prompt = system_prompt(&AppConfig::default().sources);
        assert!(prompt.contains(
            "- Entrevistas_maestros.csv: Incluye experiencias y especialidades de profesores."
        ));
        assert!(prompt.contains("- Entrevistas_estudiantes.csv:"));
        assert!(prompt.contains("- Entrevistas_maestros_ver2.csv:"));
    }

    #[test]
    fn uses_file_name_only() {
        let sources = vec![SourceConfig {
            path: "/srv/data/profesores.csv".into(),
            description: "Entrevistas.".into(),
        }];
        let prompt = system_prompt(&sources);
        assert!(prompt.contains("- profesores.csv: Entrevistas."));
        assert!(!prompt.contains("/srv/data"));
    }

    #[test]
    fn includes_usage_rules() {
        let prompt = system_prompt(&[]);
        assert!(prompt.starts_with("Eres un asistente virtual"));
        assert!(prompt.contains("**Reglas importantes:**"));
        assert!(prompt.contains("4. Nunca combines información de profesores diferentes"));
    }
}
