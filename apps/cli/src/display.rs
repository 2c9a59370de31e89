//! Plain-text rendering of interview tables.

use novainfor_knowledge::{InterviewTable, QUESTION_COLUMN};

/// Render a table as one block per row; the question comes first and empty
/// cells are omitted.
pub(crate) fn render_table(table: &InterviewTable) -> String {
    let mut out = format!(
        "== {} ({} filas) — {}\n",
        table.label,
        table.rows.len(),
        table.path.display()
    );

    let question_idx = table.headers.iter().position(|h| h == QUESTION_COLUMN);

    for (n, row) in table.rows.iter().enumerate() {
        let question = question_idx
            .and_then(|idx| row.get(idx))
            .filter(|q| !q.is_empty())
            .map(String::as_str)
            .unwrap_or("(sin pregunta)");
        out.push_str(&format!("[{}] {question}\n", n + 1));

        for (idx, (header, value)) in table.headers.iter().zip(row).enumerate() {
            if Some(idx) == question_idx || value.is_empty() {
                continue;
            }
            out.push_str(&format!("    {header}: {value}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn renders_rows_with_question_first() {
        let table = InterviewTable::from_reader(
            Path::new("Entrevistas_maestros.csv"),
            "Profesor,Pregunta,Respuesta\nDra. López,¿Qué área recomienda?,Ciberseguridad\nDr. Ruiz,,\n"
                .as_bytes(),
        )
        .unwrap();

        let out = render_table(&table);
        assert!(out.starts_with("== Entrevistas_maestros (2 filas)"));
        assert!(out.contains("[1] ¿Qué área recomienda?\n    Profesor: Dra. López\n    Respuesta: Ciberseguridad\n"));
        assert!(out.contains("[2] (sin pregunta)\n    Profesor: Dr. Ruiz\n"));
        assert!(!out.contains("Pregunta:"));
    }
}
