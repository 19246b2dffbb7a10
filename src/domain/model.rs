use crate::domain::schema::{
    Choice, ChoiceCode, FieldKind, FieldSpec, LineItem, Section, SectionKind, SectionsBuilder,
    Transaction, TransactionKind, Value,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const CAMARA: &str = "Cámara de Comercio";
const GOBERNACION: &str = "Gobernación";
const TOTALES: &str = "Totales";

// ---------------------------------------------------------------------------
// 列舉欄位
// ---------------------------------------------------------------------------

/// Shareholder count as offered by the form: exactly one, or two or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ShareholderCount {
    #[default]
    One,
    TwoOrMore,
}

impl From<ShareholderCount> for u8 {
    fn from(count: ShareholderCount) -> Self {
        match count {
            ShareholderCount::One => 1,
            ShareholderCount::TwoOrMore => 2,
        }
    }
}

impl TryFrom<u8> for ShareholderCount {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ShareholderCount::One),
            2 => Ok(ShareholderCount::TwoOrMore),
            other => Err(format!("unsupported shareholder count code: {}", other)),
        }
    }
}

pub const SHAREHOLDER_CHOICES: &[Choice] = &[
    Choice {
        code: ChoiceCode::Int(1),
        label: "1",
    },
    Choice {
        code: ChoiceCode::Int(2),
        label: "2 o más",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PersonType {
    #[default]
    #[serde(rename = "PN")]
    Natural,
    #[serde(rename = "PJ")]
    Legal,
}

pub const PERSON_TYPE_CHOICES: &[Choice] = &[
    Choice {
        code: ChoiceCode::Str("PN"),
        label: "Natural",
    },
    Choice {
        code: ChoiceCode::Str("PJ"),
        label: "Jurídica",
    },
];

fn person_type_label(code: &str) -> String {
    PERSON_TYPE_CHOICES
        .iter()
        .find(|choice| choice.code.as_text() == code)
        .map(|choice| choice.label.to_string())
        .unwrap_or_else(|| code.to_string())
}

// ---------------------------------------------------------------------------
// Constitución
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Incorporation;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncorporationInput {
    pub capital_suscrito: u64,
    pub capital_pagado: u64,
    pub numero_accionistas: ShareholderCount,
    pub matricula_establecimiento: bool,
    pub aporte_establecimiento: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncorporationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_suscrito: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_pagado: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero_accionistas: Option<u64>,

    pub inscripcion_documento: Option<Decimal>,
    pub matricula_persona_juridica: Option<Decimal>,
    pub formulario_rues: Option<Decimal>,
    pub matricula_establecimiento: Option<Decimal>,
    pub aporte_establecimiento: Option<Decimal>,
    pub situacion_control: Option<Decimal>,
    pub total_camara_comercio: Option<Decimal>,

    pub impuesto_registro_cuantia: Option<Decimal>,
    pub impuesto_registro_sin_cuantia: Option<Decimal>,
    pub total_gobernacion: Option<Decimal>,

    pub total_constitucion: Option<Decimal>,
}

const INCORPORATION_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "capitalSuscrito",
        label: "Capital Suscrito",
        kind: FieldKind::Amount,
    },
    FieldSpec {
        key: "capitalPagado",
        label: "Capital Pagado",
        kind: FieldKind::Amount,
    },
    FieldSpec {
        key: "numeroAccionistas",
        label: "Número de Accionistas",
        kind: FieldKind::Choice(SHAREHOLDER_CHOICES),
    },
    FieldSpec {
        key: "matriculaEstablecimiento",
        label: "Matrícula Establecimiento",
        kind: FieldKind::Flag,
    },
    FieldSpec {
        key: "aporteEstablecimiento",
        label: "Aporte Establecimiento",
        kind: FieldKind::Flag,
    },
];

impl Transaction for Incorporation {
    const KIND: TransactionKind = TransactionKind::Incorporation;
    type Input = IncorporationInput;
    type Output = IncorporationResult;

    fn fields() -> &'static [FieldSpec] {
        INCORPORATION_FIELDS
    }

    fn sections(r: &IncorporationResult) -> Vec<Section> {
        SectionsBuilder::new()
            .section(Section::new(
                "Datos Base",
                SectionKind::Inputs,
                vec![
                    LineItem::item("Capital Suscrito", Value::Currency(r.capital_suscrito)),
                    LineItem::item("Capital Pagado", Value::Currency(r.capital_pagado)),
                    LineItem::item("Número de Accionistas", Value::Count(r.numero_accionistas)),
                ],
            ))
            .section(Section::new(
                CAMARA,
                SectionKind::Authority,
                vec![
                    LineItem::item("Inscripción Documento", Value::Currency(r.inscripcion_documento)),
                    LineItem::item(
                        "Matrícula Persona Jurídica",
                        Value::Currency(r.matricula_persona_juridica),
                    ),
                    LineItem::item("Formulario RUES", Value::Currency(r.formulario_rues)),
                    LineItem::item(
                        "Matrícula Establecimiento",
                        Value::Currency(r.matricula_establecimiento),
                    ),
                    LineItem::item(
                        "Aporte Establecimiento",
                        Value::Currency(r.aporte_establecimiento),
                    ),
                    LineItem::item("Situación Control", Value::Currency(r.situacion_control)),
                    LineItem::subtotal(
                        "Total Cámara de Comercio",
                        Value::Currency(r.total_camara_comercio),
                    ),
                ],
            ))
            .section(Section::new(
                GOBERNACION,
                SectionKind::Authority,
                vec![
                    LineItem::item(
                        "Impuesto Registro Cuantía",
                        Value::Currency(r.impuesto_registro_cuantia),
                    ),
                    LineItem::item(
                        "Impuesto Registro sin Cuantía",
                        Value::Currency(r.impuesto_registro_sin_cuantia),
                    ),
                    LineItem::subtotal("Total Gobernación", Value::Currency(r.total_gobernacion)),
                ],
            ))
            .section(Section::new(
                TOTALES,
                SectionKind::Totals,
                vec![LineItem::total(
                    "Total Constitución",
                    Value::Currency(r.total_constitucion),
                )],
            ))
            .build()
    }
}

// ---------------------------------------------------------------------------
// Compraventa
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Transfer;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInput {
    pub valor_venta_establecimiento: u64,
    pub matricular_comprador: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_venta_establecimiento: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matricular_comprador: Option<bool>,

    /// Gobernación
    pub impuesto_registro: Option<Decimal>,
    /// DIAN
    pub retencion_dian: Option<Decimal>,
    pub ingreso_documento: Option<Decimal>,
    pub matricula_comprador: Option<Decimal>,
    pub total_camara_comercio: Option<Decimal>,
    pub total_compraventa: Option<Decimal>,
}

const TRANSFER_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "valorVentaEstablecimiento",
        label: "Valor Venta Establecimiento",
        kind: FieldKind::Amount,
    },
    FieldSpec {
        key: "matricularComprador",
        label: "Matricular Comprador",
        kind: FieldKind::Flag,
    },
];

impl Transaction for Transfer {
    const KIND: TransactionKind = TransactionKind::Transfer;
    type Input = TransferInput;
    type Output = TransferResult;

    fn fields() -> &'static [FieldSpec] {
        TRANSFER_FIELDS
    }

    fn sections(r: &TransferResult) -> Vec<Section> {
        SectionsBuilder::new()
            .section(Section::new(
                "Datos Generales",
                SectionKind::Inputs,
                vec![
                    LineItem::item(
                        "Valor Venta Establecimiento",
                        Value::Currency(r.valor_venta_establecimiento),
                    ),
                    LineItem::item("Matricular Comprador", Value::Flag(r.matricular_comprador)),
                ],
            ))
            .section(Section::new(
                "Gobernación y DIAN",
                SectionKind::Authority,
                vec![
                    LineItem::item(
                        "Impuesto Registro (Gobernación)",
                        Value::Currency(r.impuesto_registro),
                    ),
                    LineItem::item(
                        "Retención en la Fuente (DIAN)",
                        Value::Currency(r.retencion_dian),
                    ),
                ],
            ))
            .section(Section::new(
                CAMARA,
                SectionKind::Authority,
                vec![
                    LineItem::item("Ingreso Documento", Value::Currency(r.ingreso_documento)),
                    LineItem::item("Matrícula Comprador", Value::Currency(r.matricula_comprador)),
                    LineItem::subtotal(
                        "Total Cámara de Comercio",
                        Value::Currency(r.total_camara_comercio),
                    ),
                ],
            ))
            .section(Section::new(
                TOTALES,
                SectionKind::Totals,
                vec![LineItem::total(
                    "Total Compraventa",
                    Value::Currency(r.total_compraventa),
                )],
            ))
            .build()
    }
}

// ---------------------------------------------------------------------------
// Renovación
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Renewal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalInput {
    pub activos: u64,
    pub establecimientos_misma_jurisdiccion: u32,
    pub establecimientos_otra_jurisdiccion: u32,
    pub tipo_persona: PersonType,
}

impl Default for RenewalInput {
    fn default() -> Self {
        Self {
            activos: 0,
            establecimientos_misma_jurisdiccion: 1,
            establecimientos_otra_jurisdiccion: 0,
            tipo_persona: PersonType::Natural,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activos: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tipo_persona: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establecimientos_misma: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establecimientos_diferente: Option<u64>,

    pub renovacion_propietario: Option<Decimal>,
    pub renovacion_establecimientos_misma: Option<Decimal>,
    pub renovacion_establecimientos_diferente: Option<Decimal>,
    pub formulario_rues: Option<Decimal>,
    pub certificado: Option<Decimal>,
    pub total_renovacion: Option<Decimal>,
    pub total_pagar: Option<Decimal>,
    pub porcentaje_sobre_activos: Option<Decimal>,
}

const RENEWAL_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "activos",
        label: "Activos del propietario",
        kind: FieldKind::Amount,
    },
    FieldSpec {
        key: "tipoPersona",
        label: "Tipo de Persona",
        kind: FieldKind::Choice(PERSON_TYPE_CHOICES),
    },
    FieldSpec {
        key: "establecimientosMismaJurisdiccion",
        label: "Establecimientos Misma Jurisdicción",
        kind: FieldKind::Count,
    },
    FieldSpec {
        key: "establecimientosOtraJurisdiccion",
        label: "Establecimientos Otra Jurisdicción",
        kind: FieldKind::Count,
    },
];

impl Transaction for Renewal {
    const KIND: TransactionKind = TransactionKind::Renewal;
    type Input = RenewalInput;
    type Output = RenewalResult;

    fn fields() -> &'static [FieldSpec] {
        RENEWAL_FIELDS
    }

    fn sections(r: &RenewalResult) -> Vec<Section> {
        SectionsBuilder::new()
            .section(Section::new(
                "Datos Generales",
                SectionKind::Inputs,
                vec![
                    LineItem::item("Activos", Value::Currency(r.activos)),
                    LineItem::item(
                        "Tipo de Persona",
                        Value::Text(r.tipo_persona.as_deref().map(person_type_label)),
                    ),
                    LineItem::item(
                        "Número Establecimientos Misma Jurisdicción",
                        Value::Count(r.establecimientos_misma),
                    ),
                    LineItem::item(
                        "Número Establecimientos Otra Jurisdicción",
                        Value::Count(r.establecimientos_diferente),
                    ),
                ],
            ))
            .section(Section::new(
                CAMARA,
                SectionKind::Authority,
                vec![
                    LineItem::item(
                        "Renovación Propietario",
                        Value::Currency(r.renovacion_propietario),
                    ),
                    LineItem::item(
                        "Establecimientos Misma Jurisdicción",
                        Value::Currency(r.renovacion_establecimientos_misma),
                    ),
                    LineItem::item(
                        "Establecimientos Otra Jurisdicción",
                        Value::Currency(r.renovacion_establecimientos_diferente),
                    ),
                    LineItem::item("Formulario RUES", Value::Currency(r.formulario_rues)),
                    LineItem::item("Certificado", Value::Currency(r.certificado)),
                    LineItem::subtotal("Total Renovación", Value::Currency(r.total_renovacion)),
                ],
            ))
            .section(Section::new(
                TOTALES,
                SectionKind::Totals,
                vec![
                    LineItem::total("Total a Pagar", Value::Currency(r.total_pagar)),
                    LineItem::item(
                        "Porcentaje sobre Activos",
                        Value::Percent(r.porcentaje_sobre_activos),
                    ),
                ],
            ))
            .build()
    }
}
