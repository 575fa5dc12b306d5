use super::model::TabularFrame;

/// One numeric column prepared for the bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    /// One entry per row; `None` where the cell is missing.
    pub values: Vec<Option<f64>>,
}

/// The first `max_series` numeric columns of `frame`, in column order.
pub fn chart_series(frame: &TabularFrame, max_series: usize) -> Vec<ChartSeries> {
    frame
        .columns()
        .iter()
        .filter(|c| c.is_numeric())
        .take(max_series)
        .map(|c| ChartSeries {
            name: c.name.clone(),
            values: c.cells.iter().map(|cell| cell.as_f64()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;

    #[test]
    fn picks_first_two_numeric_columns() {
        let frame = parse_csv(b"name,a,b,c\nx,1,2,3\ny,,5,6\n").unwrap();
        let series = chart_series(&frame, 2);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "a");
        assert_eq!(series[0].values, vec![Some(1.0), None]);
        assert_eq!(series[1].name, "b");
    }

    #[test]
    fn text_only_frame_has_no_series() {
        let frame = parse_csv(b"name\nx\n").unwrap();
        assert!(chart_series(&frame, 2).is_empty());
    }

    #[test]
    fn does_not_touch_the_frame() {
        let frame = parse_csv(b"a\n1\n2\n").unwrap();
        let before = frame.clone();
        let _ = chart_series(&frame, 2);
        let _ = frame.head(5);
        assert_eq!(frame, before);
    }
}
