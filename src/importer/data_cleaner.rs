// ==========================================
// AEO 供应链数据看板 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化（空白、nan、NaN 视为缺失）/ 表头去重
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashSet;

/// 被视为缺失的占位写法
pub const NULL_TOKENS: &[&str] = &["nan", "NaN"];

pub struct DataCleaner;

impl DataCleaner {
    /// 单元格标准化：去首尾空白，缺失占位转为 None
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || NULL_TOKENS.contains(&trimmed) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 整行是否全部缺失
    pub fn is_blank_row(&self, row: &[Option<String>]) -> bool {
        row.iter().all(Option::is_none)
    }

    /// 表头清洗
    ///
    /// # 规则
    /// - 保留原始拼写（含前导空格等），解析器负责归一化匹配
    /// - 空表头报错
    /// - 重复表头报错（SQLite 列名大小写不敏感，按小写判重）
    pub fn clean_headers(&self, headers: &[String]) -> ImportResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut cleaned = Vec::with_capacity(headers.len());

        for (idx, header) in headers.iter().enumerate() {
            if header.trim().is_empty() {
                return Err(ImportError::MissingHeader(format!("第 {} 列", idx + 1)));
            }
            if !seen.insert(header.to_lowercase()) {
                return Err(ImportError::DuplicateHeader(header.clone()));
            }
            cleaned.push(header.clone());
        }

        if cleaned.is_empty() {
            return Err(ImportError::MissingHeader("无任何列".to_string()));
        }
        Ok(cleaned)
    }
}
