use crate::client::ClientInput;
use crate::company::{CompanyInput, CompanyPatch};
use crate::errors::ModelError;
use crate::ink::InkInput;
use crate::invoice::{InvoiceInput, InvoicePatch};
use crate::order::{OrderInput, OrderPatch};
use crate::payroll::{PayrollInput, PayrollPatch};
use crate::{Client, Company, Ink, Invoice, Order, Payroll, Resource};

fn order_input() -> OrderInput {
    OrderInput {
        company_id: "co1".into(),
        client_id: "c1".into(),
        product_id: None,
        description: "500 business cards".into(),
        quantity: 500,
        total: 45.0,
        status: "pending".into(),
        due_date: Some("2024-06-01".into()),
    }
}

#[test]
fn company_requires_name() {
    let input = CompanyInput { name: "   ".into(), ..Default::default() };
    assert!(matches!(Company::validate_input(&input), Err(ModelError::Validation(_))));
}

#[test]
fn company_rejects_malformed_email() {
    let input = CompanyInput { name: "Grafos".into(), email: Some("grafos.ec".into()), ..Default::default() };
    assert!(Company::validate_input(&input).is_err());
}

#[test]
fn empty_patch_is_valid() {
    assert!(Company::validate_patch(&CompanyPatch::default()).is_ok());
    assert!(Order::validate_patch(&OrderPatch::default()).is_ok());
}

#[test]
fn patch_cannot_blank_required_name() {
    let patch = CompanyPatch { name: Some(String::new()), ..Default::default() };
    assert!(Company::validate_patch(&patch).is_err());
}

#[test]
fn client_requires_company() {
    let input = ClientInput { name: "Juan".into(), ..Default::default() };
    assert!(Client::validate_input(&input).is_err());
}

#[test]
fn ink_kind_must_be_known() {
    let mut input = InkInput { company_id: "co1".into(), name: "Cyan".into(), kind: Some("laser".into()), ..Default::default() };
    assert!(Ink::validate_input(&input).is_err());
    input.kind = Some("offset".into());
    assert!(Ink::validate_input(&input).is_ok());
}

#[test]
fn order_status_and_due_date_checked() {
    assert!(Order::validate_input(&order_input()).is_ok());

    let bad_status = OrderInput { status: "shipped".into(), ..order_input() };
    assert!(Order::validate_input(&bad_status).is_err());

    let bad_date = OrderInput { due_date: Some("01/06/2024".into()), ..order_input() };
    assert!(Order::validate_input(&bad_date).is_err());

    let negative = OrderInput { quantity: -1, ..order_input() };
    assert!(Order::validate_input(&negative).is_err());
}

#[test]
fn payroll_period_checked_on_create_and_patch() {
    let input = PayrollInput {
        company_id: "co1".into(),
        employee_name: "Ana".into(),
        period: "2024/04".into(),
        base_salary: 460.0,
        ..Default::default()
    };
    assert!(Payroll::validate_input(&input).is_err());

    let patch = PayrollPatch { period: Some("2024-04".into()), ..Default::default() };
    assert!(Payroll::validate_patch(&patch).is_ok());
}

#[test]
fn invoice_requires_issue_date() {
    let input = InvoiceInput {
        company_id: "co1".into(),
        client_id: "c1".into(),
        order_id: None,
        number: "001-001-000001".into(),
        issued_on: String::new(),
        subtotal: 100.0,
        tax: 12.0,
        total: 112.0,
        amount_paid: 0.0,
        status: "issued".into(),
    };
    assert!(Invoice::validate_input(&input).is_err());

    let fixed = InvoiceInput { issued_on: "2024-05-03".into(), ..input };
    assert!(Invoice::validate_input(&fixed).is_ok());

    let patch = InvoicePatch { status: Some("cancelled".into()), ..Default::default() };
    assert!(Invoice::validate_patch(&patch).is_err());
}
