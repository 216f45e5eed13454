//! Menu screens for the collection service.
//!
//! Each screen is a handler struct registered against a dial pattern; the
//! whole menu is declared in [`payment_menu`]. Collaborator failures are
//! rendered into the screen text — the subscriber gets a polite line, the
//! operator gets a warning log — because surfacing them as transport errors
//! would tear down the session.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{
    DomainError, InvoiceLedger, OwnerDirectory, PaymentGateway, Property, PropertyCatalog,
};
use crate::ussd::action::ActionNode;
use crate::ussd::command::Command;
use crate::ussd::error::UssdError;
use crate::ussd::params::Params;
use crate::ussd::router::{Handler, Mux};
use crate::ussd::DialogResult;

const MAIN_MENU: &str =
    "Welcome to CityPay\n1. Pay property tax\n2. View your property code\n3. Contact support";
const CODE_PROMPT: &str = "Pay property tax, enter your property code";
const PHONE_PROMPT: &str = "Enter the phone number registered to your properties";
const SUPPORT_TEXT: &str = "For help call 8000 or visit your nearest sector office";
const INVALID_CHOICE: &str = "Invalid choice, please dial again";
const CODE_NOT_FOUND: &str = "The code you entered could not be found";
const NO_PROPERTIES: &str = "No properties are registered to this number";
const THANK_YOU: &str = "Thank you for using CityPay";
const PAYMENT_FAILED: &str = "Payment could not be started, please try again shortly";
const MONTHS_PROMPT: &str = "Enter the number of months you want to pay";
const MONTHS_NOT_A_NUMBER: &str = "Please enter the number of months in digits";

/// A short numeric entry selects the Nth property from the caller's
/// listing; anything else is taken as a literal property code.
const MAX_LISTED: usize = 10;

/// Collaborators shared by the screens.
#[derive(Clone)]
pub struct ScreenDeps {
    pub owners: Arc<dyn OwnerDirectory>,
    pub properties: Arc<dyn PropertyCatalog>,
    pub invoices: Arc<dyn InvoiceLedger>,
    pub payment: Arc<dyn PaymentGateway>,
}

/// Builds the production menu on the trie router.
pub fn payment_menu(deps: ScreenDeps) -> Mux {
    let mut mux = Mux::new();
    mux.handle("*#", MainMenu);
    mux.handle("*1#", PayEntry { deps: deps.clone() });
    mux.handle("*1*{id}#", PaymentPreview { deps: deps.clone() });
    mux.handle("*1*{id}*1#", ConfirmPayment { deps: deps.clone() });
    mux.handle("*1*{id}*2#", MonthsPrompt);
    mux.handle("*1*{id}*2*{months}#", ConfirmMonths { deps: deps.clone() });
    mux.handle("*1*{id}*3#", ConfirmArrears { deps: deps.clone() });
    mux.handle("*2#", PhonePrompt);
    mux.handle("*2*{phone}#", CodeList { deps });
    mux.handle("*3#", Support);
    mux.not_found(InvalidChoice);
    mux
}

/// The static informational menu served on the secondary short code, built
/// on the action tree. No collaborators: pure text.
pub fn info_menu() -> ActionNode {
    let mut root = ActionNode::root(|_| {
        "Welcome to CityPay\n1. View your property code\n2. Pay property tax".to_string()
    });
    root.child(1, |_| {
        "To view your property codes dial *662*104*2# and enter your registered phone number"
            .to_string()
    });
    root.child(2, |_| "To pay your property tax dial *662*104*1#".to_string());
    root
}

/// Strips the `+25`/`25` country prefix: owners register local numbers, the
/// gateway sends international ones.
fn normalize_phone(phone: &str) -> &str {
    let phone = phone.strip_prefix('+').unwrap_or(phone);
    phone.strip_prefix("25").unwrap_or(phone)
}

fn screen(text: impl Into<String>, leaf: bool) -> DialogResult {
    DialogResult {
        text: text.into(),
        leaf,
    }
}

/// Resolves a subscriber entry to a property code. An entry that parses as
/// a small index picks from the caller's listing, everything else is the
/// code itself.
async fn match_property(
    deps: &ScreenDeps,
    entry: &str,
    phone: &str,
) -> Result<String, DomainError> {
    let index: usize = match entry.parse() {
        Ok(n) if n >= 1 && n <= MAX_LISTED => n,
        _ => return Ok(entry.to_string()),
    };

    let owner = deps
        .owners
        .retrieve_by_phone(normalize_phone(phone))
        .await?;
    let page = deps
        .properties
        .retrieve_by_owner(&owner.id, 0, MAX_LISTED as i64)
        .await?;

    page.get(index - 1)
        .map(|p| p.id.clone())
        .ok_or(DomainError::NotFound("property"))
}

async fn resolve_property(
    deps: &ScreenDeps,
    params: &Params,
    phone: &str,
) -> Result<Property, DomainError> {
    let entry = params
        .get_str("id")
        .map_err(|_| DomainError::NotFound("property"))?;
    let id = match_property(deps, entry, phone).await?;
    deps.properties.retrieve(&id).await
}

struct MainMenu;

#[async_trait]
impl Handler for MainMenu {
    async fn handle(&self, _cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        Ok(screen(MAIN_MENU, params.is_leaf()))
    }
}

/// `*1#` — start of the payment flow: list the caller's properties when the
/// number is registered, otherwise ask for a code directly.
struct PayEntry {
    deps: ScreenDeps,
}

#[async_trait]
impl Handler for PayEntry {
    async fn handle(&self, cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        let owner = match self
            .deps
            .owners
            .retrieve_by_phone(normalize_phone(&cmd.phone))
            .await
        {
            Ok(owner) => owner,
            Err(DomainError::NotFound(_)) => return Ok(screen(CODE_PROMPT, params.is_leaf())),
            Err(err) => return Err(err.into()),
        };

        let page = self
            .deps
            .properties
            .retrieve_by_owner(&owner.id, 0, MAX_LISTED as i64)
            .await?;
        if page.is_empty() {
            return Ok(screen(NO_PROPERTIES, true));
        }

        let mut text = String::from("Pay property tax, choose or enter a property code:");
        for (i, property) in page.iter().enumerate() {
            text.push_str(&format!("\n{}. {} {}", i + 1, property.id, property.address.sector));
        }
        Ok(screen(text, params.is_leaf()))
    }
}

/// `*1*{id}#` — payment preview: owner, address, monthly due and, when
/// invoices are outstanding, an arrears option.
struct PaymentPreview {
    deps: ScreenDeps,
}

#[async_trait]
impl Handler for PaymentPreview {
    async fn handle(&self, cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        let property = match resolve_property(&self.deps, params, &cmd.phone).await {
            Ok(property) => property,
            Err(err) => {
                warn!(error = %err, "payment preview lookup failed");
                return Ok(screen(CODE_NOT_FOUND, true));
            }
        };
        let owner = match self.deps.owners.retrieve(&property.owner_id).await {
            Ok(owner) => owner,
            Err(err) => {
                warn!(error = %err, "owner lookup failed");
                return Ok(screen(CODE_NOT_FOUND, true));
            }
        };

        let mut text = format!(
            "You are about to pay for property {} owned by {} {}, {} {} {}, monthly due {} RWF\n1. Confirm payment\n2. Pay several months in advance",
            property.id,
            owner.fname,
            owner.lname,
            property.address.sector,
            property.address.cell,
            property.address.village,
            property.due as i64,
        );

        let unpaid = self.deps.invoices.unpaid(&property.id).await?;
        if !unpaid.is_empty() {
            let total: f64 = unpaid.iter().map(|i| i.amount).sum();
            text.push_str(&format!(
                "\n3. Pay arrears of {} RWF ({} invoices)",
                total as i64,
                unpaid.len()
            ));
        }

        Ok(screen(text, params.is_leaf()))
    }
}

/// `*1*{id}*1#` — confirm: pull this month's due from the caller's mobile
/// money account and close.
struct ConfirmPayment {
    deps: ScreenDeps,
}

#[async_trait]
impl Handler for ConfirmPayment {
    async fn handle(&self, cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        let property = match resolve_property(&self.deps, params, &cmd.phone).await {
            Ok(property) => property,
            Err(err) => {
                warn!(error = %err, "payment confirmation lookup failed");
                return Ok(screen(CODE_NOT_FOUND, true));
            }
        };

        match self
            .deps
            .payment
            .initiate(&property, normalize_phone(&cmd.phone), property.due)
            .await
        {
            Ok(_) => Ok(screen(THANK_YOU, true)),
            Err(err) => {
                warn!(error = %err, property = %property.id, "payment initiation failed");
                Ok(screen(PAYMENT_FAILED, true))
            }
        }
    }
}

/// `*1*{id}*2#` — pay several months in advance: ask how many.
struct MonthsPrompt;

#[async_trait]
impl Handler for MonthsPrompt {
    async fn handle(&self, _cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        Ok(screen(MONTHS_PROMPT, params.is_leaf()))
    }
}

/// `*1*{id}*2*{months}#` — confirm: pull `months × due` and close.
struct ConfirmMonths {
    deps: ScreenDeps,
}

#[async_trait]
impl Handler for ConfirmMonths {
    async fn handle(&self, cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        let months = match params.get_i64("months") {
            Ok(n) if n >= 1 => n,
            _ => return Ok(screen(MONTHS_NOT_A_NUMBER, true)),
        };

        let property = match resolve_property(&self.deps, params, &cmd.phone).await {
            Ok(property) => property,
            Err(err) => {
                warn!(error = %err, "advance payment lookup failed");
                return Ok(screen(CODE_NOT_FOUND, true));
            }
        };

        let amount = property.due * months as f64;
        match self
            .deps
            .payment
            .initiate(&property, normalize_phone(&cmd.phone), amount)
            .await
        {
            Ok(_) => Ok(screen(
                format!(
                    "{}. {} months totalling {} RWF will be collected",
                    THANK_YOU, months, amount as i64
                ),
                true,
            )),
            Err(err) => {
                warn!(error = %err, property = %property.id, "advance initiation failed");
                Ok(screen(PAYMENT_FAILED, true))
            }
        }
    }
}

/// `*1*{id}*3#` — confirm: pull all outstanding arrears and close.
struct ConfirmArrears {
    deps: ScreenDeps,
}

#[async_trait]
impl Handler for ConfirmArrears {
    async fn handle(&self, cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        let property = match resolve_property(&self.deps, params, &cmd.phone).await {
            Ok(property) => property,
            Err(err) => {
                warn!(error = %err, "arrears confirmation lookup failed");
                return Ok(screen(CODE_NOT_FOUND, true));
            }
        };

        let unpaid = self.deps.invoices.unpaid(&property.id).await?;
        if unpaid.is_empty() {
            return Ok(screen("No arrears are due on this property", true));
        }
        let total: f64 = unpaid.iter().map(|i| i.amount).sum();

        match self
            .deps
            .payment
            .initiate(&property, normalize_phone(&cmd.phone), total)
            .await
        {
            Ok(_) => Ok(screen(
                format!("{}. Arrears of {} RWF will be collected", THANK_YOU, total as i64),
                true,
            )),
            Err(err) => {
                warn!(error = %err, property = %property.id, "arrears initiation failed");
                Ok(screen(PAYMENT_FAILED, true))
            }
        }
    }
}

/// `*2#` — property-code lookup: ask for the registered phone number.
struct PhonePrompt;

#[async_trait]
impl Handler for PhonePrompt {
    async fn handle(&self, _cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        Ok(screen(PHONE_PROMPT, params.is_leaf()))
    }
}

/// `*2*{phone}#` — list the codes registered to the entered number, close.
struct CodeList {
    deps: ScreenDeps,
}

#[async_trait]
impl Handler for CodeList {
    async fn handle(&self, _cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        let phone = params.get_str("phone")?;

        let owner = match self
            .deps
            .owners
            .retrieve_by_phone(normalize_phone(phone))
            .await
        {
            Ok(owner) => owner,
            Err(DomainError::NotFound(_)) => return Ok(screen(NO_PROPERTIES, true)),
            Err(err) => return Err(err.into()),
        };

        let page = self
            .deps
            .properties
            .retrieve_by_owner(&owner.id, 0, MAX_LISTED as i64)
            .await?;
        if page.is_empty() {
            return Ok(screen(NO_PROPERTIES, true));
        }

        let mut text = String::from("Your property codes:");
        for property in &page {
            text.push_str(&format!("\n{}", property.id));
        }
        Ok(screen(text, true))
    }
}

struct Support;

#[async_trait]
impl Handler for Support {
    async fn handle(&self, _cmd: &Command, params: &Params) -> Result<DialogResult, UssdError> {
        Ok(screen(SUPPORT_TEXT, params.is_leaf()))
    }
}

/// Fallback for unregistered dial paths: stay polite, close the session.
struct InvalidChoice;

#[async_trait]
impl Handler for InvalidChoice {
    async fn handle(&self, _cmd: &Command, _params: &Params) -> Result<DialogResult, UssdError> {
        Ok(screen(INVALID_CHOICE, true))
    }
}
