//! Generación de informes Markdown para el frontend.
//!
//! Capa exclusivamente de presentación: aquí viven el texto decorativo
//! aleatorio y el renderizado mermaid. El núcleo (extractor, clasificador,
//! recomendador) permanece determinista.

use std::path::Path;

use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{FileCategory, FlowDiagram, MethodologyRecord};

/// Frases de conclusión decorativas del informe de análisis.
const CONCLUSIONS: &[&str] = &[
    "文件数据完整度高，可用于采购策略建模。",
    "数据存在零散性，建议先做标准化清洗。",
    "内容与采购场景强相关，适合辅助方法论落地。",
    "数据呈现出明确的采购模式，可直接应用推荐的方法论。",
];

/// Informe Markdown del análisis de un fichero.
pub fn analysis_report(
    path: &Path,
    category: FileCategory,
    size_bytes: u64,
    industry: &str,
    objective: &str,
    record: &MethodologyRecord,
) -> String {
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());
    let size_mb = size_bytes as f64 / (1024.0 * 1024.0);
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

    let mut rng = rand::thread_rng();
    let data_points: u32 = rng.gen_range(3..=10);
    let trends: u32 = rng.gen_range(1..=3);
    let conclusion = CONCLUSIONS.choose(&mut rng).copied().unwrap_or(CONCLUSIONS[0]);

    let industry_line = if industry.is_empty() { "未明确识别" } else { industry };
    let objective_line = if objective.is_empty() { "未明确识别" } else { objective };

    let mut report = format!(
        "# 文件分析报告\n\n\
         ## 基本信息\n\
         - 文件名: {file_name}\n\
         - 文件类型: {}\n\
         - 大小: {size_mb:.2} MB\n\
         - 分析时间: {timestamp}\n\n\
         ## 内容提取\n\
         - 识别到的行业: {industry_line}\n\
         - 识别到的采购目标: {objective_line}\n\n\
         ## 内容分析\n\
         - 识别到 {data_points} 个关键数据点\n\
         - 发现 {trends} 条潜在趋势/异常\n\
         - 建议结合「采购方法论」进一步优化策略\n\n\
         ## 结论\n\
         {conclusion}\n\n",
        category.display_name(),
    );

    report.push_str(&methodology_section(record));
    report
}

/// Informe Markdown de una recomendación directa (sin fichero).
pub fn recommendation_report(record: &MethodologyRecord) -> String {
    format!("# 采购方法论推荐结果\n\n{}", methodology_section(record))
}

fn methodology_section(record: &MethodologyRecord) -> String {
    let mut section = format!(
        "## 推荐的采购方法论\n\n### {}\n{}\n",
        record.title, record.rationale
    );

    if let Some(diagram) = &record.diagram {
        section.push_str("\n## 方法论流程图\n\n```mermaid\n");
        section.push_str(&flow_to_mermaid(diagram));
        section.push_str("```\n");
    }

    section
}

/// Renderiza el flujo estructurado como un grafo dirigido mermaid.
/// Los pasos con alguna rama condicional se dibujan como nodos de decisión.
pub fn flow_to_mermaid(diagram: &FlowDiagram) -> String {
    let mut output = String::from("graph TD\n");

    let node_id = |label: &str| -> String {
        diagram
            .steps
            .iter()
            .position(|s| s.label == label)
            .map(|idx| format!("N{idx}"))
            .unwrap_or_else(|| "N_".to_string())
    };

    for (idx, flow_step) in diagram.steps.iter().enumerate() {
        let text = if flow_step.detail.is_empty() {
            flow_step.label.clone()
        } else {
            format!("{}<br/>({})", flow_step.label, flow_step.detail)
        };

        let is_decision = flow_step.branches.iter().any(|b| !b.condition.is_empty());
        if is_decision {
            output.push_str(&format!("    N{idx}{{{text}}}\n"));
        } else {
            output.push_str(&format!("    N{idx}[{text}]\n"));
        }
    }

    for (idx, flow_step) in diagram.steps.iter().enumerate() {
        for branch in &flow_step.branches {
            let target = node_id(&branch.target);
            if branch.condition.is_empty() {
                output.push_str(&format!("    N{idx} --> {target}\n"));
            } else {
                output.push_str(&format!("    N{idx} -->|{}| {target}\n", branch.condition));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::Advisor;
    use crate::config::RuleSet;

    fn sample_record() -> MethodologyRecord {
        Advisor::new(RuleSet::Extended, true).recommend("制造", "物料计划")
    }

    #[test]
    fn mermaid_contains_every_step() {
        let record = sample_record();
        let diagram = record.diagram.expect("diagrama");
        let mermaid = flow_to_mermaid(&diagram);

        assert!(mermaid.starts_with("graph TD\n"));
        for flow_step in &diagram.steps {
            assert!(mermaid.contains(flow_step.label.as_str()));
        }
    }

    #[test]
    fn mermaid_renders_decision_nodes_and_conditions() {
        let record = sample_record();
        let mermaid = flow_to_mermaid(&record.diagram.expect("diagrama"));

        assert!(mermaid.contains("{净需求>0?}"));
        assert!(mermaid.contains("-->|是|"));
        assert!(mermaid.contains("-->|否|"));
    }

    #[test]
    fn recommendation_report_embeds_title_and_flow() {
        let record = sample_record();
        let report = recommendation_report(&record);

        assert!(report.contains("# 采购方法论推荐结果"));
        assert!(report.contains("### MRP物料需求计划方法论"));
        assert!(report.contains("```mermaid"));
    }

    #[test]
    fn analysis_report_marks_missing_labels() {
        let record = Advisor::new(RuleSet::Extended, false).recommend("", "");
        let report = analysis_report(
            Path::new("datos.csv"),
            FileCategory::Csv,
            2 * 1024 * 1024,
            "",
            "",
            &record,
        );

        assert!(report.contains("- 文件名: datos.csv"));
        assert!(report.contains("- 文件类型: CSV文件"));
        assert!(report.contains("- 大小: 2.00 MB"));
        assert!(report.contains("识别到的行业: 未明确识别"));
        assert!(report.contains("### 采购策略综合评估法"));
        assert!(!report.contains("```mermaid"));
    }
}
