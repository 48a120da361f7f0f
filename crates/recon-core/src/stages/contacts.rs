use super::{Stage, StageContext, StageOutput};
use crate::classifier::normalize_digits;
use crate::error::Result;
use crate::report::{Contacts, Fragment, MailboxCandidate, MailboxCategory, PhoneContact, StageKind};
use crate::request::PersonName;
use async_trait::async_trait;

/// Conventional role mailboxes: (local part, confidence, category)
pub const ROLE_MAILBOXES: &[(&str, u8, MailboxCategory)] = &[
    ("admin", 70, MailboxCategory::Administrative),
    ("info", 80, MailboxCategory::General),
    ("contact", 75, MailboxCategory::General),
    ("support", 70, MailboxCategory::Support),
    ("sales", 65, MailboxCategory::Commercial),
    ("security", 55, MailboxCategory::Security),
    ("webmaster", 50, MailboxCategory::Technical),
    ("abuse", 45, MailboxCategory::Technical),
    ("postmaster", 45, MailboxCategory::Technical),
    ("hr", 40, MailboxCategory::Administrative),
];

/// Mailbox candidates plus classification of any supplied phone numbers
pub struct ContactStage;

impl ContactStage {
    fn local_part(word: &str) -> String {
        word.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    fn person_mailboxes(person: &PersonName, domain: &str) -> Vec<MailboxCandidate> {
        let first = Self::local_part(&person.first);
        let last = Self::local_part(&person.last);
        if first.is_empty() {
            return Vec::new();
        }

        let personal = |local: String, confidence: u8| MailboxCandidate {
            address: format!("{}@{}", local, domain),
            confidence,
            category: MailboxCategory::Personal,
        };

        if last.is_empty() {
            return vec![personal(first, 75)];
        }

        let initial = &first[..1];
        vec![
            personal(format!("{}.{}", first, last), 85),
            personal(first.clone(), 75),
            personal(format!("{}{}", initial, last), 65),
        ]
    }
}

#[async_trait]
impl Stage for ContactStage {
    fn kind(&self) -> StageKind {
        StageKind::Contacts
    }

    async fn run(&self, ctx: &StageContext) -> Result<StageOutput> {
        let domain = ctx.domain.as_str();

        let mut mailboxes = ctx
            .request
            .person
            .as_ref()
            .map(|person| Self::person_mailboxes(person, domain))
            .unwrap_or_default();

        mailboxes.extend(
            ROLE_MAILBOXES
                .iter()
                .map(|(local, confidence, category)| MailboxCandidate {
                    address: format!("{}@{}", local, domain),
                    confidence: *confidence,
                    category: *category,
                }),
        );

        let phones = ctx
            .request
            .phones
            .iter()
            .map(|raw| {
                let digits = normalize_digits(raw);
                let (origin, error) = match ctx.providers.numbers.classify(&digits) {
                    Ok(record) => (Some(record), None),
                    Err(e) => (None, Some(e.to_string())),
                };
                PhoneContact {
                    raw: raw.clone(),
                    digits,
                    origin,
                    error,
                }
            })
            .collect();

        Ok(StageOutput::derived(Fragment::Contacts(Contacts {
            mailboxes,
            phones,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::empty_context;
    use super::*;
    use crate::request::ReconRequest;
    use std::sync::Arc;

    #[tokio::test]
    async fn role_mailboxes_follow_person_patterns() {
        let mut ctx = empty_context("acme.io");
        ctx.request = Arc::new(
            ReconRequest::new("acme.io").with_person(PersonName::new("Grace", "Hopper")),
        );

        let output = ContactStage.run(&ctx).await.unwrap();
        let Fragment::Contacts(contacts) = output.fragment else {
            panic!("expected contacts fragment");
        };

        let first: Vec<_> = contacts.mailboxes[..3]
            .iter()
            .map(|m| (m.address.as_str(), m.confidence))
            .collect();
        assert_eq!(
            first,
            [("grace.hopper@acme.io", 85), ("grace@acme.io", 75), ("ghopper@acme.io", 65)]
        );
        assert_eq!(contacts.mailboxes.len(), 3 + ROLE_MAILBOXES.len());
        assert_eq!(contacts.mailboxes[3].address, "admin@acme.io");
    }

    #[tokio::test]
    async fn phones_are_normalized_then_classified() {
        let mut ctx = empty_context("acme.io");
        ctx.request = Arc::new(
            ReconRequest::new("acme.io")
                .with_phone("+55 (11) 99999-9999")
                .with_phone("000 123"),
        );

        let output = ContactStage.run(&ctx).await.unwrap();
        let Fragment::Contacts(contacts) = output.fragment else {
            panic!("expected contacts fragment");
        };

        let brazil = &contacts.phones[0];
        assert_eq!(brazil.digits, "5511999999999");
        assert_eq!(brazil.origin.as_ref().map(|o| o.country.as_str()), Some("Brazil"));

        let unknown = &contacts.phones[1];
        assert!(unknown.origin.is_none());
        assert!(unknown.error.as_deref().unwrap_or_default().contains("Unrecognized"));
        assert_eq!(output.status.label(), "derived");
    }
}
