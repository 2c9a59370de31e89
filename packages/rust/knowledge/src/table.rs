//! CSV ingestion: interview tables, records, and the question-keyed knowledge base.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use novainfor_shared::{NovaError, Result};

/// Name of the column that holds the lookup question.
pub const QUESTION_COLUMN: &str = "Pregunta";

// ---------------------------------------------------------------------------
// InterviewRecord
// ---------------------------------------------------------------------------

/// One interview row keyed by its question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewRecord {
    /// Trimmed, non-empty question text.
    pub question: String,
    /// Remaining columns in table order, values trimmed.
    pub fields: Vec<(String, String)>,
}

impl InterviewRecord {
    /// Look up a field value by column name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render the record as `column: value` lines, skipping empty values.
    pub fn format_answer(&self) -> String {
        self.fields
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ---------------------------------------------------------------------------
// InterviewTable
// ---------------------------------------------------------------------------

/// A parsed interview CSV, kept whole for display.
#[derive(Debug, Clone)]
pub struct InterviewTable {
    /// Short name (file stem).
    pub label: String,
    /// Where the table was read from.
    pub path: PathBuf,
    /// Trimmed header names.
    pub headers: Vec<String>,
    /// Trimmed cells, padded to the header width. Blank lines are skipped.
    pub rows: Vec<Vec<String>>,
}

impl InterviewTable {
    /// Load a table from a CSV file.
    ///
    /// Fails if the file is missing, empty, malformed, or lacks the
    /// [`QUESTION_COLUMN`] header.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| NovaError::io(path, e))?;
        let table = Self::from_reader(path, file)?;

        info!(
            label = %table.label,
            rows = table.rows.len(),
            columns = table.headers.len(),
            "interview table loaded"
        );
        Ok(table)
    }

    /// Parse a table from any reader; `path` is used for labels and errors.
    pub fn from_reader<R: Read>(path: &Path, reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| NovaError::csv(path, format!("unable to read headers: {e}")))?
            .iter()
            .map(|value| value.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(NovaError::validation(format!(
                "{}: file is empty",
                path.display()
            )));
        }

        if !headers.iter().any(|h| h == QUESTION_COLUMN) {
            return Err(NovaError::validation(format!(
                "{}: required column '{QUESTION_COLUMN}' not found (columns: {})",
                path.display(),
                headers.join(", ")
            )));
        }

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record
                .map_err(|e| NovaError::csv(path, format!("unable to read row: {e}")))?;

            if record.len() > headers.len() {
                return Err(NovaError::csv(
                    path,
                    format!(
                        "row {} has {} fields, expected at most {}",
                        line + 1,
                        record.len(),
                        headers.len()
                    ),
                ));
            }

            let mut values: Vec<String> =
                record.iter().map(|value| value.trim().to_string()).collect();
            if values.iter().all(|value| value.is_empty()) {
                continue;
            }
            values.resize(headers.len(), String::new());
            rows.push(values);
        }

        let label = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            label,
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    /// Convert rows into records, dropping rows without a question.
    pub fn records(&self) -> Vec<InterviewRecord> {
        let Some(question_idx) = self.headers.iter().position(|h| h == QUESTION_COLUMN) else {
            return Vec::new();
        };

        let mut records = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let question = row.get(question_idx).map(|q| q.trim()).unwrap_or_default();
            if question.is_empty() {
                debug!(table = %self.label, "skipping row without a question");
                continue;
            }

            let fields = self
                .headers
                .iter()
                .zip(row)
                .enumerate()
                .filter(|(idx, _)| *idx != question_idx)
                .map(|(_, (header, value))| (header.clone(), value.clone()))
                .collect();

            records.push(InterviewRecord {
                question: question.to_string(),
                fields,
            });
        }
        records
    }
}

// ---------------------------------------------------------------------------
// KnowledgeBase
// ---------------------------------------------------------------------------

/// Question → record lookup built from one or more tables.
///
/// Keys are unique and never empty. Inserting an existing question replaces
/// its record but keeps the key's original position, so iteration order is
/// first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<InterviewRecord>,
    index: HashMap<String, usize>,
}

impl KnowledgeBase {
    /// Create an empty knowledge base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every record of a table.
    pub fn from_table(table: &InterviewTable) -> Self {
        let kb = Self::from_records(table.records());
        debug!(table = %table.label, entries = kb.len(), "knowledge base built");
        kb
    }

    /// Index records in order; later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = InterviewRecord>) -> Self {
        let mut kb = Self::new();
        for record in records {
            kb.insert(record);
        }
        kb
    }

    /// Insert a record. Records with a blank question are ignored.
    /// Returns `true` if the record was stored.
    pub fn insert(&mut self, mut record: InterviewRecord) -> bool {
        let key = record.question.trim();
        if key.is_empty() {
            return false;
        }
        if key.len() != record.question.len() {
            record.question = key.to_string();
        }

        match self.index.get(&record.question) {
            Some(&pos) => {
                warn!(question = %record.question, "duplicate question, keeping the later row");
                self.entries[pos] = record;
            }
            None => {
                self.index.insert(record.question.clone(), self.entries.len());
                self.entries.push(record);
            }
        }
        true
    }

    /// Fold another knowledge base into this one with the same last-wins rule.
    pub fn merge(&mut self, other: KnowledgeBase) {
        for record in other.entries {
            self.insert(record);
        }
    }

    /// Exact lookup by question.
    pub fn get(&self, question: &str) -> Option<&InterviewRecord> {
        self.index.get(question).map(|&pos| &self.entries[pos])
    }

    /// Records in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &InterviewRecord> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Result<InterviewTable> {
        InterviewTable::from_reader(Path::new("Entrevistas_test.csv"), csv.as_bytes())
    }

    #[test]
    fn parses_headers_and_trims_cells() {
        let table = parse(
            "Pregunta, Especialidad ,Comentario\n\
             ¿Qué especialidades recomienda? ,  Redes, Alta demanda \n",
        )
        .unwrap();
        assert_eq!(table.label, "Entrevistas_test");
        assert_eq!(table.headers, vec!["Pregunta", "Especialidad", "Comentario"]);
        assert_eq!(
            table.rows[0],
            vec!["¿Qué especialidades recomienda?", "Redes", "Alta demanda"]
        );
    }

    #[test]
    fn missing_question_column_is_rejected() {
        let err = parse("Question,Answer\nhola,adios\n").unwrap_err();
        assert!(matches!(err, NovaError::Validation { .. }));
        assert!(err.to_string().contains("Pregunta"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let err = parse("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn overlong_row_is_rejected() {
        let err = parse("Pregunta,Respuesta\na,b,c\n").unwrap_err();
        assert!(matches!(err, NovaError::Csv { .. }));
    }

    #[test]
    fn short_rows_are_padded_and_blank_rows_skipped() {
        let table = parse("Pregunta,Area,Nota\n¿Por qué?,IA\n,,\n").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0], vec!["¿Por qué?", "IA", ""]);
    }

    #[test]
    fn records_drop_empty_questions_and_exclude_question_column() {
        let table = parse(
            "Nombre,Pregunta,Respuesta\n\
             Ana,¿Qué estudiaste?,Redes\n\
             Luis,   ,Software\n",
        )
        .unwrap();
        let records = table.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].question, "¿Qué estudiaste?");
        assert_eq!(
            records[0].fields,
            vec![
                ("Nombre".to_string(), "Ana".to_string()),
                ("Respuesta".to_string(), "Redes".to_string()),
            ]
        );
        assert_eq!(records[0].field("Respuesta"), Some("Redes"));
        assert_eq!(records[0].field("Pregunta"), None);
    }

    #[test]
    fn format_answer_skips_empty_fields() {
        let record = InterviewRecord {
            question: "q".into(),
            fields: vec![
                ("Especialidad".into(), "Redes".into()),
                ("Profesor".into(), String::new()),
                ("Comentario".into(), "Alta demanda".into()),
            ],
        };
        assert_eq!(record.format_answer(), "Especialidad: Redes\nComentario: Alta demanda");
    }

    #[test]
    fn duplicate_questions_keep_last_value_in_first_position() {
        let table = parse(
            "Pregunta,Respuesta\n\
             uno,primera\n\
             dos,segunda\n\
             uno,tercera\n",
        )
        .unwrap();
        let kb = KnowledgeBase::from_table(&table);
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.get("uno").unwrap().field("Respuesta"), Some("tercera"));
        let order: Vec<&str> = kb.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(order, vec!["uno", "dos"]);
    }

    #[test]
    fn blank_question_is_never_indexed() {
        let mut kb = KnowledgeBase::new();
        let stored = kb.insert(InterviewRecord {
            question: "   ".into(),
            fields: vec![],
        });
        assert!(!stored);
        assert!(kb.is_empty());
        assert!(kb.get("").is_none());
    }

    #[test]
    fn merge_applies_last_wins_across_tables() {
        let first = KnowledgeBase::from_table(&parse("Pregunta,R\na,1\nb,2\n").unwrap());
        let second = KnowledgeBase::from_table(&parse("Pregunta,R\nb,3\nc,4\n").unwrap());

        let mut kb = first;
        kb.merge(second);
        assert_eq!(kb.len(), 3);
        assert_eq!(kb.get("b").unwrap().field("R"), Some("3"));
    }

    #[test]
    fn load_reports_missing_file_as_io_error() {
        let err = InterviewTable::load(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, NovaError::Io { .. }));
    }

    #[test]
    fn fixture_tables_load() {
        for name in [
            "Entrevistas_maestros.csv",
            "Entrevistas_estudiantes.csv",
            "Entrevistas_maestros_ver2.csv",
        ] {
            let path = Path::new("../../../fixtures/csv").join(name);
            let table = InterviewTable::load(&path).expect("load fixture");
            assert!(!table.rows.is_empty(), "{name} has rows");
            assert!(!KnowledgeBase::from_table(&table).is_empty());
        }
    }
}
