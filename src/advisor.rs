//! Recomendador de metodologías de compras.
//!
//! Flujo:
//!   1. Normalizar (industria, objetivo) a minúsculas sin espacios extremos.
//!   2. Detectar señales por presencia de subcadenas disparadoras.
//!   3. Recorrer la tabla de decisión en orden de prioridad fijo; la
//!      primera regla satisfecha determina la metodología.
//!
//! Función total y determinista: toda pareja de entradas, incluidas dos
//! cadenas vacías, resuelve a algún registro (el de evaluación integral).

use crate::config::RuleSet;
use crate::models::{FlowBranch, FlowDiagram, FlowStep, MethodologyRecord};

/// Recomendador configurado con su tabla de reglas y la opción de
/// adjuntar el flujo de decisión de cada metodología. Sólo lectura tras
/// la construcción.
#[derive(Debug, Clone)]
pub struct Advisor {
    rule_set: RuleSet,
    include_diagrams: bool,
}

impl Advisor {
    pub fn new(rule_set: RuleSet, include_diagrams: bool) -> Self {
        Self {
            rule_set,
            include_diagrams,
        }
    }

    /// Recomienda una metodología para la pareja (industria, objetivo).
    ///
    /// Entrada independiente del análisis de ficheros: acepta texto libre
    /// escrito a mano igual que etiquetas ya clasificadas.
    pub fn recommend(&self, industry: &str, objective: &str) -> MethodologyRecord {
        let industry_lower = industry.to_lowercase().trim().to_string();
        let objective_lower = objective.to_lowercase().trim().to_string();

        let is_manufacturing = contains_any(&industry_lower, &["制造", "生产", "manufacture"]);
        let wants_portfolio = contains_any(&objective_lower, &["分类", "组合", "portfolio"]);
        let wants_collaboration =
            contains_any(&objective_lower, &["合作", "联合", "协作", "collaboration"]);
        let wants_material_plan =
            contains_any(&objective_lower, &["物料", "计划", "mrp", "生产排期"]);
        let wants_maintenance =
            contains_any(&objective_lower, &["维护", "维修", "mro", "间接物料"]);
        let wants_cost_reduction =
            contains_any(&objective_lower, &["成本", "节约", "降低", "control", "reduce"]);

        if wants_portfolio {
            self.kraljic()
        } else if wants_collaboration {
            self.vmi()
        } else if wants_material_plan && is_manufacturing {
            self.mrp()
        } else if wants_maintenance {
            self.mro()
        } else if wants_cost_reduction && self.rule_set == RuleSet::Extended {
            self.tco()
        } else {
            self.fallback()
        }
    }

    fn record(
        &self,
        title: &str,
        rationale: &str,
        diagram: fn() -> FlowDiagram,
    ) -> MethodologyRecord {
        MethodologyRecord {
            title: title.to_string(),
            rationale: rationale.to_string(),
            diagram: self.include_diagrams.then(diagram),
        }
    }

    fn kraljic(&self) -> MethodologyRecord {
        self.record(
            "卡拉杰克采购组合模型",
            "通过「战略型、杠杆型、瓶颈型、常规型」分类，优化采购资源与供应商关系，降本提效。",
            kraljic_flow,
        )
    }

    fn vmi(&self) -> MethodologyRecord {
        self.record(
            "VMI联合价值创造模型",
            "供应商深度参与库存管理，减少积压/缺货，适合长期战略合作场景。",
            vmi_flow,
        )
    }

    fn mrp(&self) -> MethodologyRecord {
        self.record(
            "MRP物料需求计划方法论",
            "基于生产计划精准计算物料需求，减少库存浪费，适配制造型企业排产。",
            mrp_flow,
        )
    }

    fn mro(&self) -> MethodologyRecord {
        self.record(
            "MRO分类采购管理方法论",
            "聚焦非生产物料（维护/维修/运营），分类管控间接采购成本，保障产线稳定。",
            mro_flow,
        )
    }

    fn tco(&self) -> MethodologyRecord {
        self.record(
            "TCO总成本优化方法论",
            "从采购、使用到处置的全生命周期成本分析，识别隐性节约空间，系统性降低总拥有成本。",
            tco_flow,
        )
    }

    fn fallback(&self) -> MethodologyRecord {
        self.record(
            "采购策略综合评估法",
            "建议先梳理采购物品属性、供应商关系、成本结构，再适配具体方法论。",
            fallback_flow,
        )
    }
}

fn contains_any(text: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|trigger| text.contains(trigger))
}

// ---------------------------------------------------------------------
// Flujos de decisión fijos por metodología. Contenido estático, nunca
// generado; las ramas referencian pasos por su etiqueta.
// ---------------------------------------------------------------------

fn step(label: &str, detail: &str, branches: &[(&str, &str)]) -> FlowStep {
    FlowStep {
        label: label.to_string(),
        detail: detail.to_string(),
        branches: branches
            .iter()
            .map(|(condition, target)| FlowBranch {
                condition: condition.to_string(),
                target: target.to_string(),
            })
            .collect(),
    }
}

fn kraljic_flow() -> FlowDiagram {
    FlowDiagram {
        steps: vec![
            step(
                "确定采购物品清单",
                "",
                &[("", "分析物品重要性"), ("", "分析供应风险")],
            ),
            step("分析物品重要性", "对业务影响", &[("", "重要性高?")]),
            step("分析供应风险", "稀缺性/替代难度", &[("", "供应风险高?")]),
            step("重要性高?", "", &[("是", "战略型物品"), ("否", "杠杆型物品")]),
            step("供应风险高?", "", &[("是", "瓶颈型物品"), ("否", "常规型物品")]),
            step("战略型物品", "例：核心零部件", &[("", "建立长期战略合作")]),
            step("杠杆型物品", "例：标准化原材料", &[("", "集中采购+招标压价")]),
            step("瓶颈型物品", "例：独家配件", &[("", "多源寻源+库存缓冲")]),
            step("常规型物品", "例：办公用品", &[("", "简化流程+自动化采购")]),
            step("建立长期战略合作", "", &[]),
            step("集中采购+招标压价", "", &[]),
            step("多源寻源+库存缓冲", "", &[]),
            step("简化流程+自动化采购", "", &[]),
        ],
    }
}

fn vmi_flow() -> FlowDiagram {
    FlowDiagram {
        steps: vec![
            step("供需双方签订VMI协议", "", &[("", "共享销售/库存数据")]),
            step("共享销售/库存数据", "实时同步", &[("", "供应商预测需求")]),
            step("供应商预测需求", "结合历史数据", &[("", "库存低于安全线?")]),
            step(
                "库存低于安全线?",
                "",
                &[("是", "自动补货至目标库存"), ("否", "维持现有库存")],
            ),
            step("自动补货至目标库存", "", &[("", "双方定期复盘")]),
            step("维持现有库存", "", &[]),
            step(
                "双方定期复盘",
                "调整预测模型",
                &[("循环优化", "共享销售/库存数据")],
            ),
        ],
    }
}

fn mrp_flow() -> FlowDiagram {
    FlowDiagram {
        steps: vec![
            step("制定主生产计划", "MPS", &[("", "分解物料清单")]),
            step("分解物料清单", "BOM层级展开", &[("", "统计现有库存")]),
            step("统计现有库存", "含在途/在制", &[("", "计算净需求")]),
            step(
                "计算净需求",
                "毛需求-库存-在途",
                &[("", "净需求>0?")],
            ),
            step("净需求>0?", "", &[("是", "生成采购订单"), ("否", "无需采购")]),
            step("生成采购订单", "按提前期", &[("", "跟踪订单交付")]),
            step("无需采购", "", &[]),
            step("跟踪订单交付", "与生产计划匹配", &[("", "生产执行与反馈")]),
            step("生产执行与反馈", "", &[]),
        ],
    }
}

fn mro_flow() -> FlowDiagram {
    FlowDiagram {
        steps: vec![
            step("梳理MRO物料清单", "", &[("", "物料分类")]),
            step(
                "物料分类",
                "按消耗频率与价值",
                &[
                    ("高频低价值", "长期协议+自动补货"),
                    ("低频高价值", "战略寻源+最小库存"),
                    ("应急必需", "多供应商+安全库存"),
                ],
            ),
            step("长期协议+自动补货", "", &[("", "定期消耗分析")]),
            step("战略寻源+最小库存", "", &[("", "供应商响应速度考核")]),
            step("多供应商+安全库存", "", &[("", "模拟应急场景")]),
            step("定期消耗分析", "优化补货参数", &[]),
            step("供应商响应速度考核", "", &[]),
            step("模拟应急场景", "测试供应能力", &[]),
        ],
    }
}

fn tco_flow() -> FlowDiagram {
    FlowDiagram {
        steps: vec![
            step("确定分析对象", "单一物品/品类", &[("", "计算采购成本")]),
            step("计算采购成本", "价格+运输+税费", &[("", "计算使用成本")]),
            step("计算使用成本", "能耗+维护+人工", &[("", "计算处置成本")]),
            step("计算处置成本", "报废+环保+替代", &[("", "汇总总拥有成本")]),
            step(
                "汇总总拥有成本",
                "TCO=采购+使用+处置",
                &[("", "识别成本占比最高项")],
            ),
            step(
                "识别成本占比最高项",
                "例如：维护成本过高",
                &[("", "针对性优化")],
            ),
            step("针对性优化", "例：换高效型号", &[("", "验证优化效果")]),
            step("验证优化效果", "TCO降低比例", &[]),
        ],
    }
}

fn fallback_flow() -> FlowDiagram {
    FlowDiagram {
        steps: vec![
            step("明确采购目标", "降本/保供/创新", &[("", "分析物品特性")]),
            step("分析物品特性", "价值/风险/复杂度", &[("", "评估现有供应商")]),
            step("评估现有供应商", "能力/合作历史", &[("", "梳理内外部约束")]),
            step("梳理内外部约束", "预算/时间/政策", &[("", "匹配候选方法论")]),
            step("匹配候选方法论", "对比优缺点", &[("", "小范围试点验证")]),
            step("小范围试点验证", "", &[("", "全面推广+持续迭代")]),
            step("全面推广+持续迭代", "", &[]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extended() -> Advisor {
        Advisor::new(RuleSet::Extended, true)
    }

    #[test]
    fn empty_inputs_resolve_to_fallback() {
        let record = extended().recommend("", "");
        assert_eq!(record.title, "采购策略综合评估法");
        assert!(record.diagram.is_some());
    }

    #[test]
    fn portfolio_beats_collaboration() {
        // El objetivo contiene disparadores de cartera y de colaboración:
        // gana la regla de mayor prioridad (Kraljic).
        let record = extended().recommend("零售", "对供应商组合分类，并加强合作");
        assert_eq!(record.title, "卡拉杰克采购组合模型");
    }

    #[test]
    fn collaboration_selects_vmi() {
        let record = extended().recommend("", "希望与供应商联合管理库存");
        assert_eq!(record.title, "VMI联合价值创造模型");
    }

    #[test]
    fn material_plan_requires_manufacturing_industry() {
        let advisor = extended();

        // Sin industria, el plan de materiales no basta para MRP.
        let record = advisor.recommend("", "物料计划");
        assert_ne!(record.title, "MRP物料需求计划方法论");
        assert_eq!(record.title, "采购策略综合评估法");

        let record = advisor.recommend("制造", "物料计划");
        assert_eq!(record.title, "MRP物料需求计划方法论");
    }

    #[test]
    fn maintenance_selects_mro() {
        let record = extended().recommend("建筑", "降低间接物料的维修开支");
        // "维修" llega antes que la regla de costes.
        assert_eq!(record.title, "MRO分类采购管理方法论");
    }

    #[test]
    fn cost_reduction_depends_on_rule_set() {
        let record = extended().recommend("", "希望节约采购成本");
        assert_eq!(record.title, "TCO总成本优化方法论");

        let minimal = Advisor::new(RuleSet::Minimal, true);
        let record = minimal.recommend("", "希望节约采购成本");
        assert_eq!(record.title, "采购策略综合评估法");
    }

    #[test]
    fn inputs_are_trimmed_and_lowercased() {
        let record = extended().recommend("  MANUFACTURE  ", "  necesitamos un PORTFOLIO  ");
        assert_eq!(record.title, "卡拉杰克采购组合模型");
    }

    #[test]
    fn recommend_is_deterministic() {
        let advisor = extended();
        let first = advisor.recommend("制造", "物料计划");
        let second = advisor.recommend("制造", "物料计划");
        assert_eq!(first, second);

        let first_json = serde_json::to_string(&first).expect("serialización");
        let second_json = serde_json::to_string(&second).expect("serialización");
        assert_eq!(first_json, second_json);
    }

    #[test]
    fn diagrams_can_be_disabled() {
        let advisor = Advisor::new(RuleSet::Extended, false);
        let record = advisor.recommend("制造", "物料计划");
        assert!(record.diagram.is_none());
    }

    #[test]
    fn every_branch_target_is_a_declared_step() {
        for flow in [
            kraljic_flow(),
            vmi_flow(),
            mrp_flow(),
            mro_flow(),
            tco_flow(),
            fallback_flow(),
        ] {
            let labels: Vec<&str> = flow.steps.iter().map(|s| s.label.as_str()).collect();
            for flow_step in &flow.steps {
                for branch in &flow_step.branches {
                    assert!(
                        labels.contains(&branch.target.as_str()),
                        "rama hacia paso inexistente: {}",
                        branch.target
                    );
                }
            }
        }
    }
}
