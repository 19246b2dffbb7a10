//! Field schemas and section layouts shared by the three transaction types.
//!
//! Each transaction supplies its editable fields and its result grouping as
//! data; the normalizer, presenter and print generator only ever walk these
//! structures.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Incorporation,
    Transfer,
    Renewal,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [
        TransactionKind::Incorporation,
        TransactionKind::Transfer,
        TransactionKind::Renewal,
    ];

    /// 服務端點上的路徑片段
    pub fn segment(&self) -> &'static str {
        match self {
            TransactionKind::Incorporation => "constitucion",
            TransactionKind::Transfer => "compraventa",
            TransactionKind::Renewal => "renovacion",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TransactionKind::Incorporation => "Constitución",
            TransactionKind::Transfer => "Compraventa",
            TransactionKind::Renewal => "Renovación",
        }
    }

    pub fn result_title(&self) -> String {
        format!("Resultado {}", self.title())
    }
}

/// Canonical value stored in the input model when a choice is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceCode {
    Int(u64),
    Str(&'static str),
}

impl ChoiceCode {
    pub fn to_json(self) -> serde_json::Value {
        match self {
            ChoiceCode::Int(n) => serde_json::Value::from(n),
            ChoiceCode::Str(s) => serde_json::Value::from(s),
        }
    }

    pub fn as_text(self) -> String {
        match self {
            ChoiceCode::Int(n) => n.to_string(),
            ChoiceCode::Str(s) => s.to_string(),
        }
    }

    pub fn matches_json(self, value: &serde_json::Value) -> bool {
        match self {
            ChoiceCode::Int(n) => value.as_u64() == Some(n),
            ChoiceCode::Str(s) => value.as_str() == Some(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub code: ChoiceCode,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole pesos, edited as thousands-separated text
    Amount,
    /// Non-negative integer, edited the same way as amounts
    Count,
    Flag,
    Choice(&'static [Choice]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key in the request body
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Currency(Option<Decimal>),
    Percent(Option<Decimal>),
    Count(Option<u64>),
    Flag(Option<bool>),
    Text(Option<String>),
}

impl Value {
    pub fn is_present(&self) -> bool {
        match self {
            Value::Currency(v) | Value::Percent(v) => v.is_some(),
            Value::Count(v) => v.is_some(),
            Value::Flag(v) => v.is_some(),
            Value::Text(v) => v.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Item,
    Subtotal,
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub label: &'static str,
    pub value: Value,
    pub role: LineRole,
}

impl LineItem {
    pub fn item(label: &'static str, value: Value) -> Self {
        Self {
            label,
            value,
            role: LineRole::Item,
        }
    }

    pub fn subtotal(label: &'static str, value: Value) -> Self {
        Self {
            label,
            value,
            role: LineRole::Subtotal,
        }
    }

    pub fn total(label: &'static str, value: Value) -> Self {
        Self {
            label,
            value,
            role: LineRole::Total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Input values echoed back by the service
    Inputs,
    /// Fees charged by one issuing authority
    Authority,
    Totals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub kind: SectionKind,
    pub lines: Vec<LineItem>,
}

impl Section {
    pub fn new(title: &'static str, kind: SectionKind, lines: Vec<LineItem>) -> Self {
        Self { title, kind, lines }
    }
}

/// Collects sections, dropping an echoed-inputs section the service left empty.
#[derive(Debug, Default)]
pub struct SectionsBuilder {
    sections: Vec<Section>,
}

impl SectionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, section: Section) -> Self {
        let skip = section.kind == SectionKind::Inputs
            && !section.lines.iter().any(|line| line.value.is_present());
        if !skip {
            self.sections.push(section);
        }
        self
    }

    pub fn build(self) -> Vec<Section> {
        self.sections
    }
}

/// One request/response contract with the calculation service.
pub trait Transaction: Send + Sync + 'static {
    const KIND: TransactionKind;

    type Input: Serialize + DeserializeOwned + Default + Clone + Debug + PartialEq + Send + Sync;
    type Output: Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync;

    fn fields() -> &'static [FieldSpec];

    fn sections(result: &Self::Output) -> Vec<Section>;

    fn field(key: &str) -> Option<&'static FieldSpec> {
        Self::fields().iter().find(|spec| spec.key == key)
    }
}
