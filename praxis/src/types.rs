//! Shared ID types and small helpers used across the crate.
//!
//! Every business entity carries an `OrganizationId`; the aliases below keep
//! signatures readable and make it obvious which UUID a function expects.

use uuid::Uuid;

pub type OrganizationId = Uuid;
pub type UserId = Uuid;
pub type ClientId = Uuid;
pub type ContactId = Uuid;
pub type DealId = Uuid;
pub type ProposalId = Uuid;
pub type ContractId = Uuid;
pub type EngagementId = Uuid;
pub type ProjectId = Uuid;
pub type VendorId = Uuid;
pub type InvoiceId = Uuid;
pub type BillId = Uuid;
pub type ThreadId = Uuid;
pub type MessageId = Uuid;

/// Abbreviate a UUID to its first 8 characters for log fields.
pub fn abbrev_uuid(id: &Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }
}
