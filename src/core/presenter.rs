//! Terminal rendering of a result, grouped by issuing authority.

use crate::core::normalizer::format_amount;
use crate::domain::schema::{LineRole, Section, Transaction, Value};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

pub const MISSING: &str = "-";

/// es-CO peso formatting without decimals: `$ 171.000`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let grouped = match rounded.abs().to_u64() {
        Some(whole) => format_amount(whole),
        None => rounded.abs().to_string(),
    };

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-$ {}", grouped)
    } else {
        format!("$ {}", grouped)
    }
}

/// Percentages are shown as the service sent them, followed by `%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", value.normalize())
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Currency(amount) => amount.map(format_currency),
        Value::Percent(pct) => pct.map(format_percent),
        Value::Count(n) => n.map(format_amount),
        Value::Flag(flag) => flag.map(|b| if b { "Sí" } else { "No" }.to_string()),
        Value::Text(text) => text.clone(),
    }
    .unwrap_or_else(|| MISSING.to_string())
}

/// Plain-text rendering of the given sections.
pub fn render_text(title: &str, sections: &[Section]) -> String {
    let label_width = sections
        .iter()
        .flat_map(|section| section.lines.iter())
        .map(|line| line.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&"=".repeat(title.chars().count()));
    out.push('\n');

    for section in sections {
        out.push('\n');
        out.push_str(section.title);
        out.push('\n');

        for line in &section.lines {
            let marker = match line.role {
                LineRole::Item => "  ",
                LineRole::Subtotal => "= ",
                LineRole::Total => "» ",
            };
            let padding = label_width - line.label.chars().count();
            out.push_str(&format!(
                "{}{}{}  {}\n",
                marker,
                line.label,
                " ".repeat(padding),
                format_value(&line.value)
            ));
        }
    }

    out
}

pub fn render_result<T: Transaction>(result: &T::Output) -> String {
    render_text(&T::KIND.result_title(), &T::sections(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Renewal, RenewalResult};
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "$ 0");
        assert_eq!(format_currency(dec!(171000)), "$ 171.000");
        assert_eq!(format_currency(dec!(1234567.5)), "$ 1.234.568");
        assert_eq!(format_currency(dec!(999.49)), "$ 999");
        assert_eq!(format_currency(dec!(-1000)), "-$ 1.000");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0.45)), "0.45%");
        assert_eq!(format_percent(dec!(1.500)), "1.5%");
        assert_eq!(format_percent(dec!(2)), "2%");
    }

    #[test]
    fn test_missing_values_render_as_dash() {
        assert_eq!(format_value(&Value::Currency(None)), "-");
        assert_eq!(format_value(&Value::Percent(None)), "-");
        assert_eq!(format_value(&Value::Flag(Some(false))), "No");
        assert_eq!(format_value(&Value::Count(Some(2))), "2");
    }

    #[test]
    fn test_renewal_percentage_is_not_currency() {
        let result = RenewalResult {
            total_pagar: Some(dec!(512000)),
            porcentaje_sobre_activos: Some(dec!(0.2048)),
            ..Default::default()
        };
        let text = render_result::<Renewal>(&result);

        assert!(text.starts_with("Resultado Renovación\n"));
        assert!(text.contains("Total a Pagar"));
        assert!(text.contains("$ 512.000"));
        assert!(text.contains("0.2048%"));
        assert!(!text.contains("$ 0.2048"));
        assert!(text.contains("Certificado"));
    }
}
