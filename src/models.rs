//! Modelos de dominio (tipos de fichero, clasificación y metodologías).

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Tipo declarado de un fichero subido, deducido de su extensión.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileCategory {
    Word,
    Spreadsheet,
    Csv,
    Other,
}

impl FileCategory {
    /// Deduce la categoría a partir de la extensión del fichero.
    /// PDF figura entre los tipos aceptados por la interfaz pero su
    /// contenido no se extrae, así que cae en `Other`.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "docx" | "doc" => Self::Word,
            "xlsx" | "xls" => Self::Spreadsheet,
            "csv" => Self::Csv,
            _ => Self::Other,
        }
    }

    /// Nombre del tipo tal y como aparece en el informe.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Word => "Word文档",
            Self::Spreadsheet => "Excel文档",
            Self::Csv => "CSV文件",
            Self::Other => "其他文件",
        }
    }
}

/// Resultado de la clasificación por palabras clave.
/// Una cadena vacía significa que ninguna entrada del diccionario coincidió.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub industry: String,
    pub objective: String,
}

/// Una rama condicional de un paso del flujo de decisión.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowBranch {
    pub condition: String,
    pub target: String,
}

/// Un paso del flujo de decisión de una metodología.
/// Sin ramas, el paso enlaza con el siguiente de la secuencia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowStep {
    pub label: String,
    pub detail: String,
    pub branches: Vec<FlowBranch>,
}

/// Descripción estructurada del flujo de decisión de una metodología,
/// apta para renderizarse como diagrama dirigido (mermaid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowDiagram {
    pub steps: Vec<FlowStep>,
}

/// Metodología de compras recomendada: título fijo, justificación fija
/// y, opcionalmente, su flujo de decisión.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodologyRecord {
    pub title: String,
    pub rationale: String,
    pub diagram: Option<FlowDiagram>,
}

/// Nodo del árbol de ficheros que se muestra en el frontend.
#[derive(Debug, Clone, Serialize)]
pub struct FileTreeNode {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub children: Vec<FileTreeNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_category_from_extension() {
        assert_eq!(FileCategory::from_path(Path::new("a/informe.docx")), FileCategory::Word);
        assert_eq!(FileCategory::from_path(Path::new("datos.XLSX")), FileCategory::Spreadsheet);
        assert_eq!(FileCategory::from_path(Path::new("datos.csv")), FileCategory::Csv);
        assert_eq!(FileCategory::from_path(Path::new("manual.pdf")), FileCategory::Other);
        assert_eq!(FileCategory::from_path(Path::new("sin_extension")), FileCategory::Other);
    }
}
