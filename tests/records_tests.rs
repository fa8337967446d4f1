// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use hubledger::error::{OccurrenceIdError, RecordError};
use hubledger::models::{TransactionStatus, TransactionType};
use hubledger::records::{
    MAX_INSTALLMENTS, OccurrenceChanges, TransactionDraft, cancel_occurrence,
    override_occurrence, restore_occurrence, validate_record,
};
use hubledger::{MonthKey, OccurrenceId, Transaction, expand_transactions};
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn rent() -> Transaction {
    TransactionDraft {
        id: "rent".into(),
        user_id: "u1".into(),
        account_id: "checking".into(),
        category_id: Some("housing".into()),
        r#type: TransactionType::Expense,
        description: "Rent".into(),
        amount: Decimal::from(1200),
        due_date: d(2024, 1, 31),
        paid_date: None,
        status: TransactionStatus::Pending,
        notes: None,
        is_fixed: true,
        installments: None,
        tags: vec!["home".into()],
    }
    .build()
    .unwrap()
}

#[test]
fn fixed_draft_has_no_end_date() {
    let t = rent();
    assert!(t.is_fixed);
    assert_eq!(t.end_date, None);
    assert_eq!(t.start_date, Some(d(2024, 1, 31)));
    assert_eq!(t.day_of_month, Some(31));
    assert!(validate_record(&t).is_ok());
}

#[test]
fn negative_amounts_and_blank_descriptions_are_rejected() {
    let mut t = rent();
    t.amount = Decimal::from(-5);
    assert!(matches!(
        validate_record(&t),
        Err(RecordError::NegativeAmount { .. })
    ));
    let mut t = rent();
    t.description = "   ".into();
    assert!(matches!(
        validate_record(&t),
        Err(RecordError::EmptyDescription { .. })
    ));
}

#[test]
fn fixed_with_end_date_is_rejected() {
    let mut t = rent();
    t.end_date = Some(d(2025, 1, 31));
    assert_eq!(
        validate_record(&t),
        Err(RecordError::FixedWithEndDate { id: "rent".into() })
    );
}

#[test]
fn override_rows_are_validated() {
    let t = rent();
    let month = MonthKey::new(2024, 3).unwrap();
    let changes = OccurrenceChanges {
        amount: Some(Decimal::from(1250)),
        ..Default::default()
    };
    let mut row = override_occurrence(&t, month, None, "ov1", &changes).unwrap();
    assert!(validate_record(&row).is_ok());

    row.override_for_date = None;
    assert!(matches!(
        validate_record(&row),
        Err(RecordError::OverrideMissingMonth { .. })
    ));
    row.override_for_date = Some(d(2024, 3, 1));
    row.is_override = false;
    assert!(matches!(
        validate_record(&row),
        Err(RecordError::NotMarkedOverride { .. })
    ));
    row.is_override = true;
    row.is_fixed = true;
    assert!(matches!(
        validate_record(&row),
        Err(RecordError::OverrideWithRecurrence { .. })
    ));
}

#[test]
fn single_with_recurrence_fields_is_rejected() {
    let mut t = rent();
    t.is_fixed = false;
    assert!(matches!(
        validate_record(&t),
        Err(RecordError::UnexpectedRecurrence { .. })
    ));
}

#[test]
fn cancel_then_restore_round_trips_the_month() {
    let t = rent();
    let march = MonthKey::new(2024, 3).unwrap();
    let cancelled = cancel_occurrence(&t, march).unwrap();
    let out = expand_transactions(&[cancelled.clone()], d(2024, 3, 1), d(2024, 3, 31));
    assert!(out.is_empty());

    let restored = restore_occurrence(&cancelled, march).unwrap();
    assert_eq!(restored, t);
}

#[test]
fn cancel_before_series_start_is_rejected() {
    let t = rent();
    let dec = MonthKey::new(2023, 12).unwrap();
    assert_eq!(
        cancel_occurrence(&t, dec),
        Err(RecordError::MonthOutsideSeries {
            id: "rent".into(),
            month: dec
        })
    );
}

#[test]
fn single_transactions_cannot_be_cancelled_or_overridden() {
    let mut t = rent();
    t.is_fixed = false;
    t.start_date = None;
    t.day_of_month = None;
    let month = MonthKey::new(2024, 1).unwrap();
    assert!(matches!(
        cancel_occurrence(&t, month),
        Err(RecordError::NotRecurring { .. })
    ));
    assert!(matches!(
        override_occurrence(&t, month, None, "x", &OccurrenceChanges::default()),
        Err(RecordError::NotRecurring { .. })
    ));
}

#[test]
fn existing_override_is_patched_not_duplicated() {
    let t = rent();
    let month = MonthKey::new(2024, 2).unwrap();
    let first = override_occurrence(
        &t,
        month,
        None,
        "ov1",
        &OccurrenceChanges {
            amount: Some(Decimal::from(1300)),
            ..Default::default()
        },
    )
    .unwrap();
    let second = override_occurrence(
        &t,
        month,
        Some(&first),
        "ignored",
        &OccurrenceChanges {
            status: Some(TransactionStatus::Paid),
            paid_date: Some(d(2024, 2, 27)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(second.id, "ov1");
    assert_eq!(second.amount, Decimal::from(1300));
    assert_eq!(second.paid_date, Some(d(2024, 2, 27)));
    assert_eq!(second.due_date, d(2024, 2, 29));

    let reopened = override_occurrence(
        &t,
        month,
        Some(&second),
        "ignored",
        &OccurrenceChanges {
            status: Some(TransactionStatus::Pending),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(reopened.paid_date, None);
}

#[test]
fn occurrence_ids_parse_both_forms() {
    assert_eq!(
        OccurrenceId::parse("rent::2024-03").unwrap(),
        OccurrenceId::Synthetic {
            parent_id: "rent".into(),
            month: MonthKey::new(2024, 3).unwrap()
        }
    );
    assert_eq!(
        OccurrenceId::parse("ckx81ab").unwrap(),
        OccurrenceId::Real("ckx81ab".into())
    );
    assert_eq!(OccurrenceId::parse("  "), Err(OccurrenceIdError::Empty));
    assert!(matches!(
        OccurrenceId::parse("::2024-03"),
        Err(OccurrenceIdError::EmptyParent(_))
    ));
    assert!(matches!(
        OccurrenceId::parse("rent::March"),
        Err(OccurrenceIdError::InvalidMonth { .. })
    ));
    let id = OccurrenceId::parse("rent::2024-03").unwrap();
    assert_eq!(id.to_string(), "rent::2024-03");
    assert_eq!(id.real_id(), None);
}

#[test]
fn ledger_json_uses_camel_case_fields() {
    let raw = r#"{
        "id": "rent",
        "userId": "u1",
        "accountId": "checking",
        "type": "EXPENSE",
        "description": "Rent",
        "amount": "1200.00",
        "dueDate": "2024-01-31",
        "status": "PENDING",
        "isFixed": true,
        "startDate": "2024-01-31",
        "dayOfMonth": 31,
        "cancelledOccurrences": ["2024-03"]
    }"#;
    let t: Transaction = serde_json::from_str(raw).unwrap();
    assert!(t.is_fixed);
    assert!(t.is_cancelled(&MonthKey::new(2024, 3).unwrap()));
    assert!(validate_record(&t).is_ok());

    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["cancelledOccurrences"][0], "2024-03");
    assert_eq!(json["type"], "EXPENSE");
}

#[test]
fn oversized_installment_counts_are_rejected() {
    let mut draft = TransactionDraft {
        id: "big".into(),
        user_id: "u1".into(),
        account_id: "card".into(),
        category_id: None,
        r#type: TransactionType::Expense,
        description: "Loan".into(),
        amount: Decimal::from(10),
        due_date: d(2024, 1, 15),
        paid_date: None,
        status: TransactionStatus::Pending,
        notes: None,
        is_fixed: false,
        installments: Some(4_294_967_298),
        tags: Vec::new(),
    };
    assert!(matches!(
        draft.clone().build(),
        Err(RecordError::InstallmentsTooMany { installments: 4_294_967_298, .. })
    ));

    draft.installments = Some(MAX_INSTALLMENTS);
    let t = draft.build().unwrap();
    assert_eq!(t.end_date, Some(d(2123, 12, 15)));
    assert!(validate_record(&t).is_ok());

    let mut stored = t.clone();
    stored.installments = Some(4_294_967_298);
    stored.end_date = Some(d(2024, 2, 15));
    assert!(matches!(
        validate_record(&stored),
        Err(RecordError::InstallmentsTooMany { .. })
    ));
}

#[test]
fn ids_with_the_occurrence_separator_are_rejected() {
    let mut t = rent();
    t.id = "big::2024-01".into();
    assert_eq!(
        validate_record(&t),
        Err(RecordError::IdContainsSeparator {
            id: "big::2024-01".into()
        })
    );

    let draft = TransactionDraft {
        id: "big::2024-01".into(),
        user_id: "u1".into(),
        account_id: "checking".into(),
        category_id: None,
        r#type: TransactionType::Income,
        description: "Bonus".into(),
        amount: Decimal::from(500),
        due_date: d(2024, 1, 10),
        paid_date: None,
        status: TransactionStatus::Pending,
        notes: None,
        is_fixed: false,
        installments: None,
        tags: Vec::new(),
    };
    assert!(matches!(
        draft.build(),
        Err(RecordError::IdContainsSeparator { .. })
    ));

    let march = MonthKey::new(2024, 3).unwrap();
    assert!(matches!(
        override_occurrence(&rent(), march, None, "rent::2024-03", &OccurrenceChanges {
            amount: Some(Decimal::from(1)),
            ..Default::default()
        }),
        Err(RecordError::IdContainsSeparator { .. })
    ));
}

#[test]
fn cancelled_month_cannot_be_overridden() {
    let march = MonthKey::new(2024, 3).unwrap();
    let cancelled = cancel_occurrence(&rent(), march).unwrap();
    let changes = OccurrenceChanges {
        amount: Some(Decimal::from(1250)),
        ..Default::default()
    };
    assert_eq!(
        override_occurrence(&cancelled, march, None, "ov1", &changes),
        Err(RecordError::MonthCancelled {
            id: "rent".into(),
            month: march
        })
    );
    let restored = restore_occurrence(&cancelled, march).unwrap();
    assert!(override_occurrence(&restored, march, None, "ov1", &changes).is_ok());
}
