// ==========================================
// AEO 供应链数据看板 - 层级构建引擎
// ==========================================
// 职责: 扁平行 → 嵌套层级
// - 需求层级: 项目 → 构型 → (ESN, 一级件 → 二级件)
// - 通用层级: 任意字段序列，逐层去重
// 规则: 同层子节点按值升序；同一节点的属性取首次出现的行
// ==========================================

use crate::domain::demand::{ConfigDemand, DemandProgram, DemandRow, EsnEntry, Level1Part, Level2Part};
use crate::domain::report::HierarchyNode;
use crate::query::dates::display_or_raw;
use std::collections::BTreeMap;

// ==========================================
// 需求层级
// ==========================================

#[derive(Default)]
struct PartAcc {
    hwo: Option<String>,
    supplier: Option<String>,
    qpe: Option<String>,
    level2: BTreeMap<String, (Option<String>, Option<String>)>,
}

#[derive(Default)]
struct ConfigAcc {
    esns: BTreeMap<String, Option<String>>,
    parts: BTreeMap<String, PartAcc>,
}

/// 负责人拆分（逗号分隔，去空白，丢弃空项）
pub fn split_owners(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// 单机用量（缺失 / 非法 / 非正数时为 1）
pub fn parse_qpe(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.round() as i64)
        .unwrap_or(1)
}

fn set_once(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        if let Some(v) = value {
            *slot = Some(v.clone());
        }
    }
}

/// 构建需求层级
///
/// # 参数
/// - programs: 当前页项目（输出保持此顺序）
/// - rows: 这些项目的明细行（原始行序）
///
/// # 说明
/// - 缺少构型的行不进入层级
/// - ESN 发运日期转为 MM/DD/YYYY
pub fn build_demand_hierarchy(programs: &[String], rows: &[DemandRow]) -> Vec<DemandProgram> {
    let mut by_program: BTreeMap<&str, BTreeMap<String, ConfigAcc>> = BTreeMap::new();

    for row in rows {
        let (program, config) = match (row.program.as_deref(), row.config.as_deref()) {
            (Some(p), Some(c)) => (p, c),
            _ => continue,
        };
        let acc = by_program
            .entry(program)
            .or_default()
            .entry(config.to_string())
            .or_default();

        if let Some(esn) = &row.esn {
            let slot = acc.esns.entry(esn.clone()).or_insert(None);
            set_once(slot, &row.target_ship_date);
        }

        if let Some(pn) = &row.part_number {
            let part = acc.parts.entry(pn.clone()).or_default();
            set_once(&mut part.hwo, &row.hw_owner);
            set_once(&mut part.supplier, &row.supplier);
            set_once(&mut part.qpe, &row.qpe);

            if let Some(l2) = &row.level2_pn {
                let entry = part.level2.entry(l2.clone()).or_insert((None, None));
                set_once(&mut entry.0, &row.level2_raw_type);
                set_once(&mut entry.1, &row.rm_supplier);
            }
        }
    }

    programs
        .iter()
        .map(|program| {
            let configs = by_program
                .remove(program.as_str())
                .unwrap_or_default()
                .into_iter()
                .map(|(config, acc)| ConfigDemand {
                    config,
                    esns: acc
                        .esns
                        .into_iter()
                        .map(|(esn, date)| EsnEntry {
                            esn,
                            target_ship_date: date.as_deref().map(display_or_raw),
                        })
                        .collect(),
                    level1_parts: acc
                        .parts
                        .into_iter()
                        .map(|(pn, part)| Level1Part {
                            pn,
                            hwo: split_owners(part.hwo.as_deref()),
                            supplier: part.supplier,
                            qpe: parse_qpe(part.qpe.as_deref()),
                            level2_parts: part
                                .level2
                                .into_iter()
                                .map(|(pn, (raw_type, rm_supplier))| Level2Part {
                                    pn,
                                    raw_type,
                                    rm_supplier,
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect();

            DemandProgram {
                engine_program: program.clone(),
                configs,
            }
        })
        .collect()
}

// ==========================================
// 通用层级
// ==========================================

#[derive(Default)]
struct TreeAcc(BTreeMap<String, TreeAcc>);

impl TreeAcc {
    fn insert(&mut self, path: &[Option<String>]) {
        if let Some((Some(head), rest)) = path.split_first() {
            self.0.entry(head.clone()).or_default().insert(rest);
        }
    }

    fn into_nodes(self) -> Vec<HierarchyNode> {
        self.0
            .into_iter()
            .map(|(value, child)| HierarchyNode {
                value,
                children: child.into_nodes(),
            })
            .collect()
    }
}

/// 元组 → 嵌套节点（遇到缺失值即截断该路径）
pub fn build_tree(tuples: &[Vec<Option<String>>]) -> Vec<HierarchyNode> {
    let mut root = TreeAcc::default();
    for tuple in tuples {
        root.insert(tuple);
    }
    root.into_nodes()
}
