use anyhow::Result;
use httpmock::prelude::*;
use sada_client::core::client;
use sada_client::core::form::Completion;
use sada_client::core::normalizer::FieldEdit;
use sada_client::core::presenter::{format_value, render_text};
use sada_client::core::print::{escape_html, render_document, PrintOptions};
use sada_client::domain::model::{PersonType, ShareholderCount};
use sada_client::domain::schema::{Section, Transaction, Value};
use sada_client::{FormSession, HttpCalculationService, Incorporation, Renewal, Transfer};
use serde_json::json;

fn incorporation_reply() -> serde_json::Value {
    json!({
        "capitalSuscrito": 50000000,
        "capitalPagado": 20000000,
        "numeroAccionistas": 2,
        "inscripcionDocumento": 47000,
        "matriculaPersonaJuridica": 396000,
        "formularioRues": 7000,
        "matriculaEstablecimiento": 0,
        "aporteEstablecimiento": 0,
        "situacionControl": 0,
        "totalCamaraComercio": 450000,
        "impuestoRegistroCuantia": 350000,
        "impuestoRegistroSinCuantia": 0,
        "totalGobernacion": 350000,
        "totalConstitucion": 800000
    })
}

fn renewal_reply() -> serde_json::Value {
    json!({
        "activos": 120000000,
        "tipoPersona": "PJ",
        "establecimientosMisma": 2,
        "establecimientosDiferente": 1,
        "renovacionPropietario": 1173000,
        "renovacionEstablecimientosMisma": 224000,
        "renovacionEstablecimientosDiferente": 163000,
        "formularioRues": 7000,
        "certificado": 8000,
        "totalRenovacion": 1575000,
        "totalPagar": 1575000,
        "porcentajeSobreActivos": 1.3125
    })
}

/// Every line of the on-screen report must show up in the printable document.
fn assert_print_mirrors_presenter(title: &str, sections: &[Section]) {
    let text = render_text(title, sections);
    let html = render_document(title, sections, &PrintOptions::default());

    for section in sections {
        assert!(text.contains(section.title));
        assert!(html.contains(&escape_html(section.title)));

        for line in &section.lines {
            let shown = format_value(&line.value);
            assert!(text.contains(line.label), "presenter misses {}", line.label);
            assert!(
                html.contains(&format!(
                    "<th>{}</th><td>{}</td>",
                    escape_html(line.label),
                    escape_html(&shown)
                )),
                "print view misses {}",
                line.label
            );
        }
    }
}

#[tokio::test]
async fn test_incorporation_sends_shareholder_code() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/constitucion/calcular")
            .json_body(json!({
                "capitalSuscrito": 50000000,
                "capitalPagado": 20000000,
                "numeroAccionistas": 2,
                "matriculaEstablecimiento": false,
                "aporteEstablecimiento": false
            }));
        then.status(200).json_body(incorporation_reply());
    });

    let mut form = FormSession::<Incorporation>::new();
    form.edit(&FieldEdit::text("capitalSuscrito", "50.000.000"))?;
    form.edit(&FieldEdit::text("capitalPagado", "20.000.000"))?;
    form.edit(&FieldEdit::select("numeroAccionistas", "2 o más"))?;
    assert_eq!(form.input().numero_accionistas, ShareholderCount::TwoOrMore);

    let service = HttpCalculationService::new(&server.base_url(), "/api");
    assert_eq!(form.submit(&service).await, Completion::Applied);
    api_mock.assert();

    let sections = form.sections().unwrap();
    let titles: Vec<_> = sections.iter().map(|s| s.title).collect();
    assert_eq!(
        titles,
        vec!["Datos Base", "Cámara de Comercio", "Gobernación", "Totales"]
    );

    let text = render_text("Resultado Constitución", &sections);
    for label in [
        "Inscripción Documento",
        "Matrícula Persona Jurídica",
        "Formulario RUES",
        "Matrícula Establecimiento",
        "Aporte Establecimiento",
        "Situación Control",
        "Total Cámara de Comercio",
        "Impuesto Registro Cuantía",
        "Impuesto Registro sin Cuantía",
        "Total Gobernación",
        "Total Constitución",
    ] {
        assert!(text.contains(label), "missing {}", label);
    }
    assert!(text.contains("$ 800.000"));

    assert_print_mirrors_presenter("Resultado Constitución", &sections);
    Ok(())
}

#[tokio::test]
async fn test_renewal_person_type_and_percentage() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/renovacion/calcular")
            .json_body(json!({
                "activos": 120000000,
                "establecimientosMismaJurisdiccion": 2,
                "establecimientosOtraJurisdiccion": 1,
                "tipoPersona": "PJ"
            }));
        then.status(200).json_body(renewal_reply());
    });

    let mut form = FormSession::<Renewal>::new();
    form.edit(&FieldEdit::text("activos", "120.000.000"))?;
    form.edit(&FieldEdit::text("establecimientosMismaJurisdiccion", "2"))?;
    form.edit(&FieldEdit::text("establecimientosOtraJurisdiccion", "1"))?;
    let numbers_before = form.input().clone();

    form.edit(&FieldEdit::select("tipoPersona", "PJ"))?;
    assert_eq!(form.input().tipo_persona, PersonType::Legal);
    assert_eq!(form.input().activos, numbers_before.activos);
    assert_eq!(
        form.input().establecimientos_misma_jurisdiccion,
        numbers_before.establecimientos_misma_jurisdiccion
    );

    let service = HttpCalculationService::new(&server.base_url(), "/api");
    assert_eq!(form.submit(&service).await, Completion::Applied);
    api_mock.assert();

    let sections = form.sections().unwrap();
    let percentage = sections
        .iter()
        .flat_map(|s| s.lines.iter())
        .find(|line| line.label == "Porcentaje sobre Activos")
        .unwrap();
    assert!(matches!(percentage.value, Value::Percent(Some(_))));
    assert_eq!(format_value(&percentage.value), "1.3125%");

    let text = render_text("Resultado Renovación", &sections);
    assert!(text.contains("Jurídica"));
    assert!(text.contains("$ 1.575.000"));

    assert_print_mirrors_presenter("Resultado Renovación", &sections);
    Ok(())
}

#[tokio::test]
async fn test_missing_fields_render_placeholder() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/renovacion/calcular");
        then.status(200).json_body(json!({ "totalPagar": 500000 }));
    });

    let service = HttpCalculationService::new(&server.base_url(), "/api");
    let result = client::calculate::<Renewal, _>(&service, &Default::default()).await?;
    let sections = Renewal::sections(&result);
    let text = render_text("Resultado Renovación", &sections);

    let certificate = text.lines().find(|l| l.contains("Certificado")).unwrap();
    assert!(certificate.trim_end().ends_with('-'));
    assert!(!certificate.contains("$ 0"));
    Ok(())
}

#[tokio::test]
async fn test_repeated_submissions_are_identical() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/compraventa/calcular");
        then.status(200).json_body(json!({
            "impuestoRegistro": 80000,
            "retencionDian": 35000,
            "ingresoDocumento": 10000,
            "matriculaComprador": 46000,
            "totalCamaraComercio": 56000,
            "totalCompraventa": 171000
        }));
    });

    let service = HttpCalculationService::new(&server.base_url(), "/api");
    let mut form = FormSession::<Transfer>::new();
    form.edit(&FieldEdit::text("valorVentaEstablecimiento", "10.000.000"))?;

    form.submit(&service).await;
    let first = serde_json::to_vec(form.result().unwrap())?;
    form.submit(&service).await;
    let second = serde_json::to_vec(form.result().unwrap())?;

    api_mock.assert_hits(2);
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_print_mirrors_presenter_for_all_fixtures() {
    let incorporation = serde_json::from_value(incorporation_reply()).unwrap();
    assert_print_mirrors_presenter("Resultado Constitución", &Incorporation::sections(&incorporation));

    let renewal = serde_json::from_value(renewal_reply()).unwrap();
    assert_print_mirrors_presenter("Resultado Renovación", &Renewal::sections(&renewal));

    let transfer = serde_json::from_value(json!({ "totalCompraventa": 1 })).unwrap();
    assert_print_mirrors_presenter("Resultado Compraventa", &Transfer::sections(&transfer));
}
