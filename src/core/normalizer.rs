//! Two-way conversion between input model values and the localized text a
//! person types (es-CO: `.` groups thousands, no decimals).

use crate::domain::schema::{FieldKind, Transaction};
use thiserror::Error;

const THOUSANDS_SEPARATOR: char = '.';

/// A raw edit event coming from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEdit {
    Text(String),
    Toggle(bool),
    Select(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: String,
    pub raw: RawEdit,
}

impl FieldEdit {
    pub fn text(field: &str, text: &str) -> Self {
        Self {
            field: field.to_string(),
            raw: RawEdit::Text(text.to_string()),
        }
    }

    pub fn toggle(field: &str, checked: bool) -> Self {
        Self {
            field: field.to_string(),
            raw: RawEdit::Toggle(checked),
        }
    }

    pub fn select(field: &str, code: &str) -> Self {
        Self {
            field: field.to_string(),
            raw: RawEdit::Select(code.to_string()),
        }
    }
}

/// Why an edit was discarded. The previous input model stays in place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditRejection {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("'{text}' is not a whole number")]
    NotNumeric { text: String },

    #[error("'{value}' is not one of the choices for {field}")]
    UnknownChoice { field: String, value: String },

    #[error("edit kind does not match field {0}")]
    KindMismatch(String),

    #[error("value out of range for {field}: {message}")]
    OutOfRange { field: String, message: String },
}

/// Formats a whole amount with es-CO grouping: `10000000` -> `10.000.000`.
pub fn format_amount(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }

    out
}

/// Parses localized text back into a whole amount.
///
/// Separators and surrounding whitespace are ignored; an empty field reads as
/// zero. Anything else that is not a digit makes the edit invalid.
pub fn parse_amount(text: &str) -> Option<u64> {
    let stripped: String = text
        .trim()
        .chars()
        .filter(|ch| *ch != THOUSANDS_SEPARATOR)
        .collect();

    if stripped.is_empty() {
        return Some(0);
    }

    if !stripped.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }

    stripped.parse().ok()
}

/// Computes the next input model for one edit. Pure: `prev` is never touched.
pub fn apply_edit<T: Transaction>(
    prev: &T::Input,
    edit: &FieldEdit,
) -> Result<T::Input, EditRejection> {
    let spec = T::field(&edit.field).ok_or_else(|| EditRejection::UnknownField(edit.field.clone()))?;

    let value = match (&spec.kind, &edit.raw) {
        (FieldKind::Amount | FieldKind::Count, RawEdit::Text(text)) => {
            let amount = parse_amount(text).ok_or_else(|| EditRejection::NotNumeric {
                text: text.clone(),
            })?;
            serde_json::Value::from(amount)
        }
        (FieldKind::Flag, RawEdit::Toggle(checked)) => serde_json::Value::Bool(*checked),
        (FieldKind::Choice(choices), RawEdit::Select(selected)) => {
            let wanted = selected.trim();
            choices
                .iter()
                .find(|choice| {
                    choice.code.as_text() == wanted || choice.label.eq_ignore_ascii_case(wanted)
                })
                .map(|choice| choice.code.to_json())
                .ok_or_else(|| EditRejection::UnknownChoice {
                    field: spec.key.to_string(),
                    value: selected.clone(),
                })?
        }
        _ => return Err(EditRejection::KindMismatch(spec.key.to_string())),
    };

    let out_of_range = |e: serde_json::Error| EditRejection::OutOfRange {
        field: spec.key.to_string(),
        message: e.to_string(),
    };

    let mut object = serde_json::to_value(prev).map_err(out_of_range)?;
    match object.as_object_mut() {
        Some(map) => {
            map.insert(spec.key.to_string(), value);
        }
        None => return Err(EditRejection::KindMismatch(spec.key.to_string())),
    }

    // 反序列化失敗（例如超出 u32）即視為拒絕
    serde_json::from_value(object).map_err(out_of_range)
}

/// Text shown for one field of the input model.
pub fn display_value<T: Transaction>(input: &T::Input, field: &str) -> Option<String> {
    let spec = T::field(field)?;
    let object = serde_json::to_value(input).ok()?;
    let value = object.get(spec.key)?;

    match spec.kind {
        FieldKind::Amount | FieldKind::Count => value.as_u64().map(format_amount),
        FieldKind::Flag => value.as_bool().map(|b| if b { "Sí" } else { "No" }.to_string()),
        FieldKind::Choice(choices) => choices
            .iter()
            .find(|choice| choice.code.matches_json(value))
            .map(|choice| choice.label.to_string()),
    }
}

/// `(label, display text)` for every field, in form order.
pub fn display_form<T: Transaction>(input: &T::Input) -> Vec<(&'static str, String)> {
    T::fields()
        .iter()
        .map(|spec| {
            let shown = display_value::<T>(input, spec.key).unwrap_or_else(|| "-".to_string());
            (spec.label, shown)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        Incorporation, IncorporationInput, PersonType, Renewal, RenewalInput, ShareholderCount,
        Transfer, TransferInput,
    };

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1.000");
        assert_eq!(format_amount(10_000_000), "10.000.000");
        assert_eq!(format_amount(123_456_789), "123.456.789");
    }

    #[test]
    fn test_parse_format_roundtrip() {
        let samples = [0, 1, 12, 999, 1_000, 45_678, 1_000_000, 987_654_321, u64::MAX];
        for n in samples {
            assert_eq!(parse_amount(&format_amount(n)), Some(n), "value {}", n);
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_formatted_amount_parses_back(n in proptest::prelude::any::<u64>()) {
            proptest::prop_assert_eq!(parse_amount(&format_amount(n)), Some(n));
        }

        #[test]
        fn prop_grouping_splits_every_three_digits(n in 1_000u64..) {
            let formatted = format_amount(n);
            let groups: Vec<&str> = formatted.split('.').collect();
            proptest::prop_assert!(groups[0].len() <= 3 && !groups[0].is_empty());
            proptest::prop_assert!(groups[1..].iter().all(|g| g.len() == 3));
        }
    }

    #[test]
    fn test_parse_amount_rejects_non_numeric() {
        assert_eq!(parse_amount("12a.000"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("1,5"), None);
        assert_eq!(parse_amount("$ 1.000"), None);
        assert_eq!(parse_amount(""), Some(0));
        assert_eq!(parse_amount(" 2.500 "), Some(2_500));
    }

    #[test]
    fn test_amount_edit_updates_only_that_field() {
        let prev = TransferInput::default();
        let next =
            apply_edit::<Transfer>(&prev, &FieldEdit::text("valorVentaEstablecimiento", "10.000.000"))
                .unwrap();

        assert_eq!(next.valor_venta_establecimiento, 10_000_000);
        assert!(!next.matricular_comprador);
        assert_eq!(prev, TransferInput::default());
    }

    #[test]
    fn test_non_numeric_edit_is_rejected() {
        let prev = TransferInput {
            valor_venta_establecimiento: 5_000,
            matricular_comprador: true,
        };
        let outcome =
            apply_edit::<Transfer>(&prev, &FieldEdit::text("valorVentaEstablecimiento", "5.000x"));

        assert!(matches!(outcome, Err(EditRejection::NotNumeric { .. })));
    }

    #[test]
    fn test_shareholder_selection_stores_code() {
        let prev = IncorporationInput::default();

        let by_code =
            apply_edit::<Incorporation>(&prev, &FieldEdit::select("numeroAccionistas", "2")).unwrap();
        let by_label =
            apply_edit::<Incorporation>(&prev, &FieldEdit::select("numeroAccionistas", "2 o más"))
                .unwrap();

        assert_eq!(by_code.numero_accionistas, ShareholderCount::TwoOrMore);
        assert_eq!(by_label, by_code);
        assert_eq!(serde_json::to_value(&by_code).unwrap()["numeroAccionistas"], 2);
    }

    #[test]
    fn test_person_type_toggle_keeps_numbers() {
        let prev = RenewalInput {
            activos: 250_000_000,
            establecimientos_misma_jurisdiccion: 3,
            establecimientos_otra_jurisdiccion: 2,
            tipo_persona: PersonType::Natural,
        };
        let next = apply_edit::<Renewal>(&prev, &FieldEdit::select("tipoPersona", "PJ")).unwrap();

        assert_eq!(next.tipo_persona, PersonType::Legal);
        assert_eq!(next.activos, prev.activos);
        assert_eq!(
            next.establecimientos_misma_jurisdiccion,
            prev.establecimientos_misma_jurisdiccion
        );
        assert_eq!(
            next.establecimientos_otra_jurisdiccion,
            prev.establecimientos_otra_jurisdiccion
        );
    }

    #[test]
    fn test_count_overflow_is_rejected() {
        let prev = RenewalInput::default();
        let outcome = apply_edit::<Renewal>(
            &prev,
            &FieldEdit::text("establecimientosOtraJurisdiccion", "99.999.999.999"),
        );
        assert!(matches!(outcome, Err(EditRejection::OutOfRange { .. })));
    }

    #[test]
    fn test_mismatched_and_unknown_edits() {
        let prev = TransferInput::default();
        assert!(matches!(
            apply_edit::<Transfer>(&prev, &FieldEdit::toggle("valorVentaEstablecimiento", true)),
            Err(EditRejection::KindMismatch(_))
        ));
        assert!(matches!(
            apply_edit::<Transfer>(&prev, &FieldEdit::text("nope", "1")),
            Err(EditRejection::UnknownField(_))
        ));
    }

    #[test]
    fn test_display_form() {
        let input = IncorporationInput {
            capital_suscrito: 20_000_000,
            numero_accionistas: ShareholderCount::TwoOrMore,
            matricula_establecimiento: true,
            ..Default::default()
        };
        let shown = display_form::<Incorporation>(&input);

        assert_eq!(shown[0], ("Capital Suscrito", "20.000.000".to_string()));
        assert_eq!(shown[1], ("Capital Pagado", "0".to_string()));
        assert_eq!(shown[2], ("Número de Accionistas", "2 o más".to_string()));
        assert_eq!(shown[3], ("Matrícula Establecimiento", "Sí".to_string()));
    }
}
