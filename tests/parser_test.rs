use jobmail_tracker::*;

const VIEWED_HTML: &str = r#"<html><body><table>
<tr><td><a href="https://www.linkedin.com/comm/jobs/view/1" style="font-size: 16px; line-height: 1.25; color: #0a66c2;">Senior Data&nbsp;Engineer</a></td></tr>
<tr><td><p class="text-system-gray-100 text-sm leading-[20px]">Globex &amp; Co · Berlin,   Germany</p></td></tr>
</table></body></html>"#;

// --- Applied ---

#[test]
fn test_parse_applied() {
    let body = "Hi Jane,\n\
                Your application was sent to Acme Corp\n\
                \n\
                Software Engineer\n\
                Acme Corp\n\
                Remote\n\
                \n\
                Applied on January 5, 2024";

    let fields = parse_applied(body).unwrap();

    assert_eq!(fields, ParsedFields::new("Software Engineer", "Acme Corp", "Remote"));
}

#[test]
fn test_parse_applied_trims_and_skips_blank_lines() {
    let body = "Your application was sent to Acme\r\n   \r\n  Staff Engineer  \r\n\r\nAcme\r\n\tNew York, NY \r\n";

    let fields = parse_applied(body).unwrap();

    assert_eq!(fields.job_title, "Staff Engineer");
    assert_eq!(fields.company_name, "Acme");
    assert_eq!(fields.location, "New York, NY");
}

#[test]
fn test_parse_applied_missing_location() {
    let body = "Your application was sent to Acme Corp\nSoftware Engineer\nAcme Corp\n";

    let err = parse_applied(body).unwrap_err();

    assert_eq!(err, ParseError::MissingFields(vec![Field::Location]));
    assert!(err.to_string().contains("Location"));
}

#[test]
fn test_parse_applied_without_anchor() {
    let err = parse_applied("Thanks for applying!\nSoftware Engineer\nAcme\nRemote").unwrap_err();

    assert_eq!(
        err,
        ParseError::MissingFields(vec![Field::JobTitle, Field::CompanyName, Field::Location])
    );
}

// --- Viewed / Rejected ---

#[test]
fn test_parse_viewed_from_html() {
    let parsed = parse_viewed_rejected(VIEWED_HTML, "Your application was viewed by Globex");

    assert!(parsed.is_ok());
    assert_eq!(parsed.fields.job_title, "Senior Data Engineer");
    assert_eq!(parsed.fields.company_name, "Globex & Co");
    assert_eq!(parsed.fields.location, "Berlin, Germany");
}

#[test]
fn test_parse_viewed_middot_entity() {
    let html = "<p class=\"x\">Initech &middot; Austin, TX</p>";

    let parsed = parse_viewed_rejected(html, "");

    assert_eq!(parsed.fields.company_name, "Initech");
    assert_eq!(parsed.fields.location, "Austin, TX");
}

#[test]
fn test_parse_subject_application_to_fallback() {
    let parsed = parse_viewed_rejected(
        "<html><body><p>Thank you for your interest.</p></body></html>",
        "Your application to Backend Engineer at Beta Inc",
    );

    assert_eq!(parsed.error, None);
    assert_eq!(
        parsed.fields,
        ParsedFields::new("Backend Engineer", "Beta Inc", "")
    );
}

#[test]
fn test_parse_subject_viewed_by_fallback() {
    let parsed = parse_viewed_rejected("", "Your application was viewed by Umbrella &amp; Sons");

    assert!(parsed.is_ok());
    assert_eq!(parsed.fields.company_name, "Umbrella & Sons");
    assert_eq!(parsed.fields.job_title, "");
}

#[test]
fn test_subject_fallback_does_not_override_html() {
    let parsed = parse_viewed_rejected(
        VIEWED_HTML,
        "Your application to Data Engineer at Someone Else",
    );

    assert_eq!(parsed.fields.company_name, "Globex & Co");
    assert_eq!(parsed.fields.job_title, "Senior Data Engineer");
}

#[test]
fn test_subject_fills_only_missing_title() {
    let html = "<p>Hooli · Palo Alto</p>";

    let parsed = parse_viewed_rejected(html, "Your application to Product Manager at Pied Piper");

    assert_eq!(parsed.fields.company_name, "Hooli");
    assert_eq!(parsed.fields.job_title, "Product Manager");
    assert_eq!(parsed.fields.location, "Palo Alto");
}

#[test]
fn test_parse_company_unresolved() {
    let parsed = parse_viewed_rejected("<p>Nothing here</p>", "An update on your application");

    assert_eq!(parsed.error, Some(ParseError::CompanyUnresolved));
    assert!(parsed.fields.company_name.is_empty());
}

// --- Rule chains ---

#[test]
fn test_run_chain_reports_winning_rule() {
    let doc = Notification::new("", "Your application to Designer at Vandelay");

    let company = run_chain(COMPANY_RULES, &doc);

    assert_eq!(company.rule(), Some("subject-application-to"));
    assert_eq!(company.into_value(), "Vandelay");
    assert_eq!(run_chain(LOCATION_RULES, &doc), Extraction::NotFound);
}

#[test]
fn test_clean_text() {
    assert_eq!(clean_text("  R&amp;D\u{a0}Lead \n  Team "), "R&D Lead Team");
}

// --- Dates and comments ---

#[test]
fn test_parse_date_header_rfc2822() {
    assert_eq!(parse_date_header("Mon, 15 Jan 2024 10:00:00 -0800"), "2024-01-15");
}

#[test]
fn test_parse_date_header_with_zone_comment() {
    assert_eq!(
        parse_date_header("Thu, 9 Nov 2023 15:53:11 +0000 (UTC)"),
        "2023-11-09"
    );
}

#[test]
fn test_parse_date_header_other_layouts() {
    assert_eq!(parse_date_header("2024-03-05T23:30:00+02:00"), "2024-03-05");
    assert_eq!(parse_date_header("2024-03-05"), "2024-03-05");
    assert_eq!(parse_date_header("January 5, 2024"), "2024-01-05");
    assert_eq!(parse_date_header("received 7 Feb 2024 at noon"), "2024-02-07");
}

#[test]
fn test_parse_date_header_offsets_and_clock_layouts() {
    assert_eq!(parse_date_header("2024-05-01 10:00:00 +0000"), "2024-05-01");
    assert_eq!(parse_date_header("May 1, 2024 10:00 AM"), "2024-05-01");
    assert_eq!(parse_date_header("Wed May 1 2024"), "2024-05-01");
    assert_eq!(parse_date_header("Friday, May 3, 2024"), "2024-05-03");
}

#[test]
fn test_parse_date_header_unparseable() {
    assert_eq!(parse_date_header(""), "");
    assert_eq!(parse_date_header("not a date"), "");
}

#[test]
fn test_generate_comment() {
    assert_eq!(
        generate_comment("Your application was viewed by Acme"),
        "Email regarding: Your application was viewed by Acme"
    );
    assert_eq!(generate_comment(""), NO_SUBJECT_COMMENT);
}
