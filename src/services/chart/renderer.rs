//! Chart rendering seam
//!
//! The chart service describes *what* to draw as a [`BarChart`]; a
//! [`ChartRenderer`] turns it into image bytes.

use crate::errors::Result;

/// RGB color of a single bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarColor(pub u8, pub u8, pub u8);

impl BarColor {
    /// 解析 `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(BarColor(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    /// 柱高（百分比，未取整）
    pub value: f64,
    /// 柱顶文字
    pub annotation: String,
    pub color: BarColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Y 轴上限：至少 100，且为最高柱留出 10% 空间
    pub fn y_max(&self) -> f64 {
        let tallest = self.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
        (tallest * 1.1).max(100.0)
    }
}

#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

pub trait ChartRenderer: Send + Sync {
    fn render(&self, chart: &BarChart) -> Result<RenderedChart>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let color = BarColor::from_hex("#667eea").unwrap();
        assert_eq!(color, BarColor(0x66, 0x7e, 0xea));
        assert_eq!(color.to_hex(), "#667eea");
    }

    #[test]
    fn test_invalid_hex() {
        assert!(BarColor::from_hex("667eea").is_none());
        assert!(BarColor::from_hex("#66").is_none());
        assert!(BarColor::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_y_max() {
        let bar = |value| Bar {
            label: String::new(),
            value,
            annotation: String::new(),
            color: BarColor(0, 0, 0),
        };
        let mut chart = BarChart {
            title: String::new(),
            x_desc: String::new(),
            y_desc: String::new(),
            bars: vec![bar(40.0), bar(60.0)],
        };
        assert_eq!(chart.y_max(), 100.0);

        chart.bars = vec![bar(100.0)];
        assert!((chart.y_max() - 110.0).abs() < 1e-9);
    }
}
