// ==========================================
// AEO 供应链数据看板 - 需求图表构建
// ==========================================
// 输入: (项目, "YYYY-MM", 去重 ESN 数)
// 输出: ChartPoint，按 年 → 月 → 项目 排序
// ==========================================

use crate::domain::report::ChartPoint;
use crate::query::dates::month_abbr;

/// 构建图表数据点（无法识别的月份键丢弃）
pub fn build_chart_points(counts: Vec<(String, String, i64)>) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = counts
        .into_iter()
        .filter_map(|(program, year_month, esn_count)| {
            let (y, m) = year_month.split_once('-')?;
            let year = y.parse::<i32>().ok()?;
            let month = m.parse::<u32>().ok().filter(|m| (1..=12).contains(m))?;
            let abbr = month_abbr(month);
            Some(ChartPoint {
                program,
                month_abbr: abbr.to_string(),
                year,
                esn_count,
                month_year: format!("{}{}", year, abbr),
                month_start: format!("{}/1/{}", month, year),
                month,
            })
        })
        .collect();

    points.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then(a.month.cmp(&b.month))
            .then_with(|| a.program.cmp(&b.program))
    });
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chart_points_sorted() {
        let points = build_chart_points(vec![
            ("LM6000".into(), "2025-10".into(), 2),
            ("LM2500".into(), "2026-01".into(), 1),
            ("LM2500".into(), "2025-10".into(), 3),
            ("LM2500".into(), "bad".into(), 9),
        ]);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].program, "LM2500");
        assert_eq!(points[0].month_year, "2025Oct");
        assert_eq!(points[0].month_start, "10/1/2025");
        assert_eq!(points[1].program, "LM6000");
        assert_eq!(points[2].year, 2026);
        assert_eq!(points[2].month_abbr, "Jan");
    }
}
