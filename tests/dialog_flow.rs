//! End-to-end dialog fixture: root menu → pay → enter code → confirm,
//! driven through the dialog service over in-memory collaborators, the way
//! the gateway would replay it round-trip by round-trip.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use citypay::domain::{
    Address, DomainError, Invoice, InvoiceLedger, Owner, OwnerDirectory, PaymentGateway, Property,
    PropertyCatalog,
};
use citypay::identity::RefProvider;
use citypay::ussd::executor::Executor;
use citypay::ussd::screens::{payment_menu, ScreenDeps};
use citypay::ussd::service::DialogService;
use citypay::ussd::session::SessionRequest;

const PREFIX: &str = "*662*104#";

struct Owners(Owner);

#[async_trait]
impl OwnerDirectory for Owners {
    async fn retrieve(&self, id: &str) -> Result<Owner, DomainError> {
        if self.0.id == id {
            Ok(self.0.clone())
        } else {
            Err(DomainError::NotFound("owner"))
        }
    }

    async fn retrieve_by_phone(&self, phone: &str) -> Result<Owner, DomainError> {
        if self.0.phone == phone {
            Ok(self.0.clone())
        } else {
            Err(DomainError::NotFound("owner"))
        }
    }
}

struct Properties(Vec<Property>);

#[async_trait]
impl PropertyCatalog for Properties {
    async fn retrieve(&self, id: &str) -> Result<Property, DomainError> {
        self.0
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(DomainError::NotFound("property"))
    }

    async fn retrieve_by_owner(
        &self,
        owner_id: &str,
        _offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>, DomainError> {
        Ok(self
            .0
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

struct NoInvoices;

#[async_trait]
impl InvoiceLedger for NoInvoices {
    async fn unpaid(&self, _property_id: &str) -> Result<Vec<Invoice>, DomainError> {
        Ok(vec![])
    }
}

struct AcceptingGateway;

#[async_trait]
impl PaymentGateway for AcceptingGateway {
    async fn initiate(
        &self,
        _property: &Property,
        _payer_phone: &str,
        _amount: f64,
    ) -> Result<String, DomainError> {
        Ok("PENDING".to_string())
    }
}

struct SequentialRef;

impl RefProvider for SequentialRef {
    fn next_ref(&self) -> String {
        format!("app-{}", Utc::now().timestamp_nanos_opt().unwrap_or(0))
    }
}

fn fixture_service() -> DialogService {
    let owner = Owner {
        id: "owner-1".into(),
        fname: "Karori".into(),
        lname: "Dan".into(),
        phone: "0788123456".into(),
    };
    let property = Property {
        id: "KG123456".into(),
        owner_id: "owner-1".into(),
        address: Address {
            sector: "Remera".into(),
            cell: "Kibagabaga".into(),
            village: "Ishema".into(),
        },
        due: 5000.0,
    };

    let deps = ScreenDeps {
        owners: Arc::new(Owners(owner)),
        properties: Arc::new(Properties(vec![property])),
        invoices: Arc::new(NoInvoices),
        payment: Arc::new(AcceptingGateway),
    };

    let executor = Executor::new(Arc::new(payment_menu(deps)), PREFIX);
    DialogService::new(executor, Arc::new(SequentialRef))
}

fn request(input: &str) -> SessionRequest {
    SessionRequest {
        session_id: "session".into(),
        service_code: PREFIX.into(),
        network_code: "63510".into(),
        gw_ref: "gwref".into(),
        // A caller whose number is not registered to any owner, so the pay
        // flow prompts for a property code.
        msisdn: "250722000111".into(),
        gw_tstamp: "20260830120000".into(),
        user_input: input.into(),
        service_id: "serviceid".into(),
        tenant_id: "kigali".into(),
    }
}

#[tokio::test]
async fn pay_flow_round_trips() {
    let svc = fixture_service();

    let cases: Vec<(&str, &str, String, u8)> = vec![
        (
            "root menu",
            "*662*104#",
            "Welcome to CityPay\n1. Pay property tax\n2. View your property code\n3. Contact support"
                .to_string(),
            1,
        ),
        (
            "pay: prompt for a property code",
            "*662*104*1#",
            "Pay property tax, enter your property code".to_string(),
            1,
        ),
        (
            "pay: preview embeds owner, address and due",
            "*662*104*1*KG123456#",
            "You are about to pay for property KG123456 owned by Karori Dan, \
             Remera Kibagabaga Ishema, monthly due 5000 RWF\n1. Confirm payment\
             \n2. Pay several months in advance"
                .to_string(),
            1,
        ),
        (
            "pay: confirmation closes the session",
            "*662*104*1*KG123456*1#",
            "Thank you for using CityPay".to_string(),
            0,
        ),
    ];

    for (desc, input, expected, end) in cases {
        let res = svc.process(&request(input)).await.unwrap();
        assert_eq!(res.text, expected, "{desc}");
        assert_eq!(res.end, end, "{desc}");
        assert_eq!(res.session_id, "session", "{desc}");
        assert_eq!(res.gw_ref, "gwref", "{desc}");
        assert!(!res.app_ref.is_empty(), "{desc}");
    }
}

#[tokio::test]
async fn gateway_retransmission_is_byte_identical() {
    let svc = fixture_service();
    let first = svc
        .process(&request("*662*104*1*KG123456#"))
        .await
        .unwrap();
    let second = svc
        .process(&request("*662*104*1*KG123456#"))
        .await
        .unwrap();
    assert_eq!(first.text, second.text);
    assert_eq!(first.end, second.end);
}

#[tokio::test]
async fn empty_input_shows_the_root_menu() {
    let svc = fixture_service();
    let res = svc.process(&request("#")).await.unwrap();
    assert!(res.text.starts_with("Welcome to CityPay"));
    assert_eq!(res.end, 1);
}

#[tokio::test]
async fn unregistered_digit_never_breaks_the_session() {
    let svc = fixture_service();
    let res = svc.process(&request("*662*104*9#")).await.unwrap();
    assert_eq!(res.text, "Invalid choice, please dial again");
    assert_eq!(res.end, 0);
}

/// Registration finished before the first traversal; after that the shared
/// menu is traversed concurrently without locks.
#[tokio::test]
async fn concurrent_round_trips_share_the_menu() {
    let svc = Arc::new(fixture_service());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(async move {
            let res = svc.process(&request("*662*104*1*KG123456#")).await.unwrap();
            res.text
        }));
    }

    let mut texts = Vec::new();
    for handle in handles {
        texts.push(handle.await.unwrap());
    }
    assert!(texts.windows(2).all(|w| w[0] == w[1]));
}
