//! Startup loading of every configured interview table.

use std::path::Path;

use tracing::{info, instrument};

use novainfor_knowledge::{InterviewTable, KnowledgeBase};
use novainfor_shared::{Result, SourceConfig};

/// All loaded tables plus the merged question lookup.
#[derive(Debug, Clone)]
pub struct Library {
    /// Tables in configured order.
    pub tables: Vec<InterviewTable>,
    /// Records from every table; later tables win on duplicate questions.
    pub knowledge: KnowledgeBase,
}

impl Library {
    /// Load every source, resolving relative paths against `base_dir`.
    ///
    /// The first failing source aborts the load.
    #[instrument(skip_all, fields(sources = sources.len(), base_dir = %base_dir.display()))]
    pub fn load(sources: &[SourceConfig], base_dir: &Path) -> Result<Self> {
        let mut tables = Vec::with_capacity(sources.len());
        let mut knowledge = KnowledgeBase::new();

        for source in sources {
            let path = base_dir.join(&source.path);
            let table = InterviewTable::load(&path)?;
            knowledge.merge(KnowledgeBase::from_table(&table));
            tables.push(table);
        }

        info!(
            tables = tables.len(),
            questions = knowledge.len(),
            "interview data loaded"
        );

        Ok(Self { tables, knowledge })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novainfor_shared::{AppConfig, NovaError};

    const FIXTURES: &str = "../../../fixtures/csv";

    #[test]
    fn loads_default_sources_from_fixtures() {
        let library = Library::load(&AppConfig::default().sources, Path::new(FIXTURES)).unwrap();
        assert_eq!(library.tables.len(), 3);
        assert_eq!(library.tables[0].label, "Entrevistas_maestros");
        assert!(!library.knowledge.is_empty());
    }

    #[test]
    fn missing_source_is_fatal() {
        let sources = vec![
            SourceConfig {
                path: "Entrevistas_maestros.csv".into(),
                description: "ok".into(),
            },
            SourceConfig {
                path: "no_existe.csv".into(),
                description: "missing".into(),
            },
        ];
        let err = Library::load(&sources, Path::new(FIXTURES)).unwrap_err();
        assert!(matches!(err, NovaError::Io { .. }));
    }
}
