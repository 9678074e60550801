//! Extracción de texto plano, al mejor esfuerzo, de los documentos subidos
//! (Word, Excel, CSV). El texto resultante alimenta al clasificador.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Result};
use calamine::{open_workbook_auto, DataType, Reader};
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use tracing::warn;

use crate::models::FileCategory;

/// Texto centinela para tipos de fichero cuyo contenido no se extrae.
/// Nunca se pasa al clasificador.
pub const UNSUPPORTED_TEXT: &str = "暂不支持该类型文件的内容提取";

/// Número máximo de filas de muestra por hoja/tabla.
const MAX_SAMPLE_ROWS: usize = 5;

/// Extrae texto del fichero según su tipo declarado.
///
/// Cualquier fallo de análisis degrada a cadena vacía (se registra, nunca
/// se propaga): el llamante trata la cadena vacía como "sin texto" y se
/// salta la clasificación.
pub fn extract_file(path: &Path, category: FileCategory) -> String {
    let result = match category {
        FileCategory::Word => extract_text_from_docx(path),
        FileCategory::Spreadsheet => extract_text_from_excel(path),
        FileCategory::Csv => extract_text_from_csv(path),
        FileCategory::Other => return UNSUPPORTED_TEXT.to_string(),
    };

    match result {
        Ok(text) => text,
        Err(err) => {
            warn!("No se pudo extraer texto de {}: {err}", path.display());
            String::new()
        }
    }
}

/// Documento Word: texto de cada párrafo en orden, uno por línea.
fn extract_text_from_docx(path: &Path) -> Result<String> {
    let data = fs::read(path)?;
    let package = read_docx(&data).map_err(|err| anyhow!("DOCX ilegible: {err}"))?;

    let mut lines = Vec::new();
    for child in &package.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut buffer = String::new();
            for para_child in &paragraph.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in &run.children {
                        if let RunChild::Text(text) = run_child {
                            buffer.push_str(&text.text);
                        }
                    }
                }
            }
            lines.push(buffer);
        }
    }

    Ok(lines.join("\n"))
}

/// Documento Excel: por cada hoja (en orden de fichero), una línea con el
/// nombre de la hoja, otra con los nombres de columna y otra con hasta
/// 5 filas de muestra.
fn extract_text_from_excel(path: &Path) -> Result<String> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    let mut blocks = Vec::new();
    for sheet_name in sheet_names {
        let range = match workbook.worksheet_range(&sheet_name) {
            Some(range) => range?,
            None => continue,
        };

        let mut rows = range.rows();
        let mut lines = vec![format!("工作表: {sheet_name}")];

        if let Some(header) = rows.next() {
            let columns: Vec<String> = header
                .iter()
                .map(cell_to_string)
                .filter(|cell| !cell.is_empty())
                .collect();
            if !columns.is_empty() {
                lines.push(format!("列名: {}", columns.join(", ")));
            }
        }

        let samples = sample_rows(rows.take(MAX_SAMPLE_ROWS).map(|row| {
            row.iter()
                .map(cell_to_string)
                .filter(|cell| !cell.is_empty())
                .collect()
        }));
        if !samples.is_empty() {
            lines.push(format!("样本数据: {}", samples.join("; ")));
        }

        blocks.push(lines.join("\n"));
    }

    Ok(blocks.join("\n"))
}

/// Fichero CSV: misma extracción de columnas y filas de muestra, sin la
/// línea con el nombre de hoja.
fn extract_text_from_csv(path: &Path) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let mut lines = Vec::new();

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect();
    if !columns.is_empty() {
        lines.push(format!("列名: {}", columns.join(", ")));
    }

    let mut raw_rows = Vec::new();
    for record in reader.records().take(MAX_SAMPLE_ROWS) {
        let record = record?;
        raw_rows.push(
            record
                .iter()
                .map(|cell| cell.trim().to_string())
                .filter(|cell| !cell.is_empty())
                .collect(),
        );
    }
    let samples = sample_rows(raw_rows.into_iter());
    if !samples.is_empty() {
        lines.push(format!("样本数据: {}", samples.join("; ")));
    }

    Ok(lines.join("\n"))
}

/// Une las celdas de cada fila con comas y descarta las filas sin celdas.
fn sample_rows<I>(rows: I) -> Vec<String>
where
    I: Iterator<Item = Vec<String>>,
{
    rows.filter(|cells| !cells.is_empty())
        .map(|cells| cells.join(", "))
        .collect()
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        _ => cell.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("fichero temporal");
        file.write_all(contents.as_bytes()).expect("escritura");
        file
    }

    #[test]
    fn csv_columns_and_samples() {
        let file = write_csv("物料, 数量, 供应商\n螺丝, 100, A\n钢板, 20, B\n");
        let text = extract_file(file.path(), FileCategory::Csv);

        assert_eq!(
            text,
            "列名: 物料, 数量, 供应商\n样本数据: 螺丝, 100, A; 钢板, 20, B"
        );
    }

    #[test]
    fn csv_caps_samples_at_five_rows() {
        let mut contents = String::from("col\n");
        for i in 0..8 {
            contents.push_str(&format!("fila{i}\n"));
        }
        let file = write_csv(&contents);
        let text = extract_file(file.path(), FileCategory::Csv);

        let samples = text
            .lines()
            .find(|line| line.starts_with("样本数据"))
            .expect("línea de muestras");
        assert_eq!(samples.matches("fila").count(), 5);
    }

    #[test]
    fn csv_filters_empty_cells() {
        let file = write_csv("a,b,c\n1,,3\n,,\n");
        let text = extract_file(file.path(), FileCategory::Csv);

        // La fila totalmente vacía desaparece; las celdas vacías también.
        assert_eq!(text, "列名: a, b, c\n样本数据: 1, 3");
    }

    #[test]
    fn unsupported_category_yields_sentinel() {
        let text = extract_file(Path::new("documento.pdf"), FileCategory::Other);
        assert_eq!(text, UNSUPPORTED_TEXT);
    }

    #[test]
    fn parse_failure_degrades_to_empty_string() {
        let text = extract_file(Path::new("/no/existe.xlsx"), FileCategory::Spreadsheet);
        assert_eq!(text, "");

        let text = extract_file(Path::new("/no/existe.docx"), FileCategory::Word);
        assert_eq!(text, "");
    }
}
