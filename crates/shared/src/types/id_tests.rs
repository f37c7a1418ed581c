use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_id_creation() {
    let id = CommodityId::new();
    assert!(!id.to_string().is_empty());
}

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = AccountId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_ids_order_by_uuid() {
    let low = AccountId::from_uuid(Uuid::from_u128(1));
    let high = AccountId::from_uuid(Uuid::from_u128(2));
    let mut ids = vec![high, low];
    ids.sort();
    assert_eq!(ids, vec![low, high]);
}

#[test]
fn test_typed_id_display() {
    let uuid = Uuid::new_v4();
    let id = PartyId::from_uuid(uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = PurchaseId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(SaleId::from_str("invalid").is_err());
}

#[test]
fn test_typed_id_into_uuid() {
    let id = ExpenseId::new();
    let uuid: Uuid = id.into();
    assert_eq!(uuid, id.into_inner());
}
