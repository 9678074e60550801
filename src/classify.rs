//! Clasificación de texto libre en etiquetas de industria y objetivo de
//! compras mediante diccionarios fijos de palabras clave.
//!
//! Contrato deliberadamente simple (y estable por compatibilidad): las
//! etiquetas se recorren en orden de declaración y gana la primera cuyo
//! disparador aparezca en el texto. Sin puntuaciones ni desempates.

use crate::models::ClassificationResult;

/// Diccionario inmutable: etiquetas en orden de inserción, cada una con
/// sus subcadenas disparadoras.
#[derive(Debug, Clone)]
pub struct KeywordDictionary {
    entries: Vec<(String, Vec<String>)>,
}

impl KeywordDictionary {
    pub fn new(entries: &[(&str, &[&str])]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(label, triggers)| {
                    (
                        label.to_string(),
                        triggers.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Primera etiqueta con algún disparador presente en el texto
    /// (ya normalizado a minúsculas). Cadena vacía si ninguna coincide.
    fn first_match(&self, text: &str) -> String {
        for (label, triggers) in &self.entries {
            if triggers.iter().any(|trigger| text.contains(trigger.as_str())) {
                return label.clone();
            }
        }
        String::new()
    }
}

/// Clasificador con los dos espacios de etiquetas (industria y objetivo).
/// Datos de sólo lectura tras la construcción; seguro de compartir entre
/// peticiones sin bloqueo alguno.
#[derive(Debug, Clone)]
pub struct Classifier {
    industries: KeywordDictionary,
    objectives: KeywordDictionary,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            industries: KeywordDictionary::new(&[
                ("制造", &["制造", "生产", "manufacture", "production"]),
                ("零售", &["零售", "retail", "distribution", "销售"]),
                ("建筑", &["建筑", "construction", "building", "工程"]),
                ("医疗", &["医疗", "hospital", "medical"]),
                ("教育", &["教育", "education", "school"]),
                ("金融", &["金融", "finance", "bank"]),
            ]),
            objectives: KeywordDictionary::new(&[
                ("分类优化", &["分类", "组合", "portfolio", "categorize"]),
                ("供应商协作", &["合作", "联合", "协作", "collaboration", "供应商"]),
                ("物料计划", &["物料", "计划", "mrp", "生产排期"]),
                ("维护维修", &["维护", "维修", "mro", "间接物料"]),
                ("成本控制", &["成本", "节约", "降低", "control", "reduce"]),
            ]),
        }
    }
}

impl Classifier {
    /// Extrae (industria, objetivo) del texto. Texto vacío devuelve ambas
    /// etiquetas vacías sin recorrer los diccionarios.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        if text.is_empty() {
            return ClassificationResult::default();
        }

        let text_lower = text.to_lowercase();
        ClassificationResult {
            industry: self.industries.first_match(&text_lower),
            objective: self.objectives.first_match(&text_lower),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_returns_empty_labels() {
        let classifier = Classifier::default();
        let result = classifier.classify("");
        assert_eq!(result.industry, "");
        assert_eq!(result.objective, "");
    }

    #[test]
    fn first_matching_label_wins_per_dictionary_order() {
        let classifier = Classifier::default();
        // "分类" (分类优化) y "维修" (维护维修) presentes: gana la primera.
        let result = classifier.classify("需要对维修物品进行分类管理");
        assert_eq!(result.objective, "分类优化");
    }

    #[test]
    fn single_trigger_selects_its_label() {
        let classifier = Classifier::default();
        let result = classifier.classify("我们是一家hospital的采购部门");
        assert_eq!(result.industry, "医疗");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let classifier = Classifier::default();
        let result = classifier.classify("Our RETAIL company wants a supplier PORTFOLIO");
        assert_eq!(result.industry, "零售");
        assert_eq!(result.objective, "分类优化");
    }

    #[test]
    fn no_trigger_yields_empty_label() {
        let classifier = Classifier::default();
        let result = classifier.classify("texto sin ninguna palabra clave");
        assert_eq!(result.industry, "");
        assert_eq!(result.objective, "");
    }

    #[test]
    fn manufacturing_material_plan_example() {
        let classifier = Classifier::default();
        let result = classifier.classify("我们是一家制造企业，需要做物料计划和生产排期");
        assert_eq!(result.industry, "制造");
        assert_eq!(result.objective, "物料计划");
    }
}
