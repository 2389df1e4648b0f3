use jobmail_tracker::*;

fn meta(label: &str, subject: &str, date: &str) -> NotificationMeta {
    NotificationMeta {
        email_id: format!("<{subject}@test>"),
        label: label.into(),
        subject: subject.into(),
        date: date.into(),
        comment: generate_comment(subject),
    }
}

fn seeded() -> Reconciler {
    let mut reconciler = Reconciler::new();
    let outcome = reconciler
        .apply_applied(
            &ParsedFields::new("Software Engineer", "Acme Corp", "Remote"),
            &meta("LinkedIn/Applied", "Your application was sent to Acme Corp", "2024-01-02"),
        )
        .unwrap();
    assert_eq!(outcome, MergeOutcome::Inserted);
    reconciler
}

fn acme_key() -> ApplicationKey {
    ApplicationKey::new("acme corp", "software engineer").unwrap()
}

#[test]
fn test_applied_creates_record() {
    let reconciler = seeded();
    let record = reconciler.get(&acme_key()).unwrap();

    assert_eq!(record.company_name, "Acme Corp");
    assert_eq!(record.job_title, "Software Engineer");
    assert_eq!(record.location, "Remote");
    assert_eq!(record.status, Status::Applied);
    assert_eq!(record.date, "2024-01-02");
    assert_eq!(
        record.comment,
        "Email regarding: Your application was sent to Acme Corp"
    );
}

#[test]
fn test_viewed_upgrades_and_keeps_location() {
    let mut reconciler = seeded();

    let outcome = reconciler
        .apply_status(
            &ParsedFields::new(" software engineer", "ACME CORP ", ""),
            Status::Viewed,
            &meta("LinkedIn/Viewed", "Your application was viewed by Acme Corp", "2024-01-10"),
        )
        .unwrap();

    assert_eq!(
        outcome,
        MergeOutcome::Upgraded {
            from: Status::Applied
        }
    );
    let record = reconciler.get(&acme_key()).unwrap();
    assert_eq!(record.status, Status::Viewed);
    assert_eq!(record.location, "Remote");
    assert_eq!(record.date, "2024-01-10");
    assert_eq!(
        record.metadata_subject,
        "Your application was viewed by Acme Corp"
    );
    assert!(record.comment.starts_with("Status updated to Viewed. Original: "));
    assert!(record.comment.contains("Email regarding: Your application was sent to Acme Corp"));
    assert_eq!(record.company_name, "Acme Corp");
    assert_eq!(reconciler.len(), 1);
}

#[test]
fn test_upgrade_does_not_replace_location() {
    let mut reconciler = seeded();

    reconciler
        .apply_status(
            &ParsedFields::new("Software Engineer", "Acme Corp", "Somewhere Else"),
            Status::Rejected,
            &meta("LinkedIn/Rejected", "Your application to Software Engineer at Acme Corp", "2024-02-01"),
        )
        .unwrap();

    assert_eq!(reconciler.get(&acme_key()).unwrap().location, "Remote");
}

#[test]
fn test_rejected_is_never_downgraded() {
    let mut reconciler = seeded();
    let fields = ParsedFields::new("Software Engineer", "Acme Corp", "");

    reconciler
        .apply_status(&fields, Status::Viewed, &meta("LinkedIn/Viewed", "viewed", "2024-01-10"))
        .unwrap();
    reconciler
        .apply_status(&fields, Status::Rejected, &meta("LinkedIn/Rejected", "rejected", "2024-01-20"))
        .unwrap();
    let outcome = reconciler
        .apply_status(&fields, Status::Viewed, &meta("LinkedIn/Viewed", "viewed again", "2024-03-01"))
        .unwrap();

    assert_eq!(
        outcome,
        MergeOutcome::Unchanged {
            location_backfilled: false
        }
    );
    let record = reconciler.get(&acme_key()).unwrap();
    assert_eq!(record.status, Status::Rejected);
    assert_eq!(record.date, "2024-01-20");
    assert_eq!(record.metadata_subject, "rejected");
}

#[test]
fn test_status_priority_ignores_dates() {
    let mut reconciler = Reconciler::new();
    let fields = ParsedFields::new("Analyst", "Initech", "");

    reconciler
        .apply_status(&fields, Status::Rejected, &meta("LinkedIn/Rejected", "old rejection", "2023-05-01"))
        .unwrap();
    reconciler
        .apply_status(&fields, Status::Viewed, &meta("LinkedIn/Viewed", "new view", "2024-05-01"))
        .unwrap();

    let record = reconciler.records().next().unwrap();
    assert_eq!(record.status, Status::Rejected);
    assert_eq!(record.date, "2023-05-01");
}

#[test]
fn test_location_backfilled_when_empty() {
    let mut reconciler = Reconciler::new();
    let key = ApplicationKey::new("Initech", "Analyst").unwrap();

    reconciler
        .apply_status(
            &ParsedFields::new("Analyst", "Initech", ""),
            Status::Rejected,
            &meta("LinkedIn/Rejected", "rejected", "2024-01-20"),
        )
        .unwrap();
    let outcome = reconciler
        .apply_status(
            &ParsedFields::new("Analyst", "Initech", "Austin, TX"),
            Status::Viewed,
            &meta("LinkedIn/Viewed", "viewed", "2024-01-25"),
        )
        .unwrap();

    assert_eq!(
        outcome,
        MergeOutcome::Unchanged {
            location_backfilled: true
        }
    );
    let record = reconciler.get(&key).unwrap();
    assert_eq!(record.location, "Austin, TX");
    assert_eq!(record.status, Status::Rejected);
    assert_eq!(record.metadata_subject, "rejected");
}

#[test]
fn test_unmatched_viewed_creates_record() {
    let mut reconciler = Reconciler::new();

    let outcome = reconciler
        .apply_status(
            &ParsedFields::new("Backend Engineer", "Beta Inc", ""),
            Status::Viewed,
            &meta("LinkedIn/Viewed", "Your application to Backend Engineer at Beta Inc", "2024-04-01"),
        )
        .unwrap();

    assert_eq!(outcome, MergeOutcome::Created { unmatched: true });
    let record = reconciler.records().next().unwrap();
    assert_eq!(record.status, Status::Viewed);
    assert_eq!(record.location, "");
    assert_eq!(
        record.comment,
        "Viewed email found without matching Applied record"
    );
}

#[test]
fn test_unmatched_rejected_is_not_flagged() {
    let mut reconciler = Reconciler::new();

    let outcome = reconciler
        .apply_status(
            &ParsedFields::new("Backend Engineer", "Beta Inc", ""),
            Status::Rejected,
            &meta("LinkedIn/Rejected", "rejected", "2024-04-01"),
        )
        .unwrap();

    assert_eq!(outcome, MergeOutcome::Created { unmatched: false });
}

#[test]
fn test_duplicate_applied_last_write_wins() {
    let mut reconciler = seeded();
    reconciler
        .apply_applied(
            &ParsedFields::new("Widget Designer", "Vandelay", "Queens"),
            &meta("LinkedIn/Applied", "second", "2024-01-03"),
        )
        .unwrap();

    let outcome = reconciler
        .apply_applied(
            &ParsedFields::new("software engineer", "acme corp", "Hybrid"),
            &meta("LinkedIn/Applied", "again", "2024-01-05"),
        )
        .unwrap();

    assert_eq!(outcome, MergeOutcome::Replaced);
    let records = reconciler.into_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].location, "Hybrid");
    assert_eq!(records[0].company_name, "acme corp");
    assert_eq!(records[0].date, "2024-01-05");
    assert_eq!(records[1].company_name, "Vandelay");
}

#[test]
fn test_empty_company_is_rejected() {
    let mut reconciler = Reconciler::new();

    let err = reconciler
        .apply_status(
            &ParsedFields::new("Engineer", "  ", "Remote"),
            Status::Viewed,
            &meta("LinkedIn/Viewed", "viewed", ""),
        )
        .unwrap_err();

    assert_eq!(err, ParseError::CompanyUnresolved);
    assert!(reconciler.is_empty());
}

#[test]
fn test_late_applied_does_not_downgrade() {
    let mut reconciler = Reconciler::new();
    let key = ApplicationKey::new("Initech", "Analyst").unwrap();

    reconciler
        .apply_status(
            &ParsedFields::new("Analyst", "Initech", ""),
            Status::Rejected,
            &meta("LinkedIn/Rejected", "rejected", "2024-01-20"),
        )
        .unwrap();
    let outcome = reconciler
        .apply_applied(
            &ParsedFields::new("Analyst", "Initech", "Austin, TX"),
            &meta("LinkedIn/Applied", "applied", "2024-01-02"),
        )
        .unwrap();

    assert_eq!(
        outcome,
        MergeOutcome::Unchanged {
            location_backfilled: true
        }
    );
    let record = reconciler.get(&key).unwrap();
    assert_eq!(record.status, Status::Rejected);
    assert_eq!(record.date, "2024-01-20");
    assert_eq!(record.location, "Austin, TX");
    assert_eq!(reconciler.len(), 1);
}

#[test]
fn test_applied_through_apply_status_keeps_viewed() {
    let mut reconciler = seeded();
    let fields = ParsedFields::new("Software Engineer", "Acme Corp", "Hybrid");

    reconciler
        .apply_status(&fields, Status::Viewed, &meta("LinkedIn/Viewed", "viewed", "2024-01-10"))
        .unwrap();
    let outcome = reconciler
        .apply_status(&fields, Status::Applied, &meta("LinkedIn/Applied", "again", "2024-01-12"))
        .unwrap();

    assert_eq!(
        outcome,
        MergeOutcome::Unchanged {
            location_backfilled: false
        }
    );
    let record = reconciler.get(&acme_key()).unwrap();
    assert_eq!(record.status, Status::Viewed);
    assert_eq!(record.location, "Remote");
}
