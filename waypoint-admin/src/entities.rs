use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use waypoint_core::Endpoint;
use waypoint_table::{BaseOrder, FilterSpec, FilterValue, PageSpec, SortSpec, TableConfig, TableError, ViewState};

use crate::AdminError;

/// A facet dropdown: filter `name` constrains record field `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet {
    pub name: &'static str,
    pub field: &'static str,
}

const fn facet(name: &'static str, field: &'static str) -> Facet {
    Facet { name, field }
}

/// Static description of one back-office table.
#[derive(Debug)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub collection: &'static str,
    pub id_field: &'static str,
    pub facets: &'static [Facet],
    pub numeric_columns: &'static [&'static str],
    pub date_columns: &'static [&'static str],
    pub required_fields: &'static [&'static str],
    pub base_order: BaseOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Bookings,
    Categories,
    CircuitTransfers,
    Events,
    Hotels,
    Packages,
    Tickets,
    Users,
}

// ============================================================================
// Schemas
// ============================================================================

static BOOKINGS: EntitySchema = EntitySchema {
    kind: EntityKind::Bookings,
    collection: "bookings",
    id_field: "booking_id",
    facets: &[
        facet("status", "status"),
        facet("payment_status", "payment_status"),
        facet("event", "event_name"),
    ],
    numeric_columns: &["total_cost", "total_price", "ticket_quantity"],
    date_columns: &["booking_date", "event_date"],
    required_fields: &["booking_ref", "event_name", "booker_name", "booker_email"],
    base_order: BaseOrder::Reversed,
};

static CATEGORIES: EntitySchema = EntitySchema {
    kind: EntityKind::Categories,
    collection: "categories",
    id_field: "category_id",
    facets: &[facet("venue", "venue_id"), facet("category_type", "category_type")],
    numeric_columns: &["sort_order"],
    date_columns: &[],
    required_fields: &["venue_id", "category_name"],
    base_order: BaseOrder::AsFetched,
};

static CIRCUIT_TRANSFERS: EntitySchema = EntitySchema {
    kind: EntityKind::CircuitTransfers,
    collection: "circuit-transfers",
    id_field: "circuit_transfer_id",
    facets: &[facet("event", "event_id"), facet("transport_type", "transport_type")],
    numeric_columns: &["coach_capacity", "used", "supplier_quote", "sell_price"],
    date_columns: &["transfer_date"],
    required_fields: &["event_id", "hotel_id", "transport_type"],
    base_order: BaseOrder::AsFetched,
};

static EVENTS: EntitySchema = EntitySchema {
    kind: EntityKind::Events,
    collection: "events",
    id_field: "event_id",
    facets: &[facet("sport", "sport"), facet("venue", "venue_id")],
    numeric_columns: &[],
    date_columns: &["event_start_date", "event_end_date"],
    required_fields: &["event_name", "sport", "event_start_date", "event_end_date"],
    base_order: BaseOrder::AsFetched,
};

static HOTELS: EntitySchema = EntitySchema {
    kind: EntityKind::Hotels,
    collection: "hotels",
    id_field: "hotel_id",
    facets: &[facet("city", "city"), facet("star_rating", "star_rating")],
    numeric_columns: &["star_rating", "room_count"],
    date_columns: &[],
    required_fields: &["hotel_name", "city"],
    base_order: BaseOrder::AsFetched,
};

static PACKAGES: EntitySchema = EntitySchema {
    kind: EntityKind::Packages,
    collection: "packages",
    id_field: "package_id",
    facets: &[facet("event", "event_id"), facet("package_type", "package_type")],
    numeric_columns: &["price", "stock"],
    date_columns: &[],
    required_fields: &["event_id", "package_name", "package_type"],
    base_order: BaseOrder::AsFetched,
};

static TICKETS: EntitySchema = EntitySchema {
    kind: EntityKind::Tickets,
    collection: "stock-tickets",
    id_field: "ticket_id",
    facets: &[
        facet("event", "event_id"),
        facet("category", "ticket_category"),
        facet("supplier", "supplier"),
    ],
    numeric_columns: &["actual_stock", "used", "remaining", "unit_cost", "total_cost"],
    date_columns: &["ordered_date", "paid_date", "ticket_delivered_date"],
    required_fields: &["event_id", "ticket_category", "supplier"],
    base_order: BaseOrder::AsFetched,
};

static USERS: EntitySchema = EntitySchema {
    kind: EntityKind::Users,
    collection: "users",
    id_field: "user_id",
    facets: &[facet("role", "role"), facet("status", "status")],
    numeric_columns: &[],
    date_columns: &["created_at"],
    required_fields: &["email", "first_name", "last_name", "role"],
    base_order: BaseOrder::AsFetched,
};

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Bookings,
        EntityKind::Categories,
        EntityKind::CircuitTransfers,
        EntityKind::Events,
        EntityKind::Hotels,
        EntityKind::Packages,
        EntityKind::Tickets,
        EntityKind::Users,
    ];

    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityKind::Bookings => &BOOKINGS,
            EntityKind::Categories => &CATEGORIES,
            EntityKind::CircuitTransfers => &CIRCUIT_TRANSFERS,
            EntityKind::Events => &EVENTS,
            EntityKind::Hotels => &HOTELS,
            EntityKind::Packages => &PACKAGES,
            EntityKind::Tickets => &TICKETS,
            EntityKind::Users => &USERS,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            EntityKind::Bookings => "bookings",
            EntityKind::Categories => "categories",
            EntityKind::CircuitTransfers => "circuit-transfers",
            EntityKind::Events => "events",
            EntityKind::Hotels => "hotels",
            EntityKind::Packages => "packages",
            EntityKind::Tickets => "tickets",
            EntityKind::Users => "users",
        }
    }
}

impl FromStr for EntityKind {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| AdminError::UnknownEntity(s.to_string()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl EntitySchema {
    pub fn endpoint(&self) -> Endpoint<'static> {
        Endpoint::new(self.collection, self.id_field)
    }

    pub fn table_config(&self) -> TableConfig {
        TableConfig::new()
            .with_numeric(self.numeric_columns.iter().copied())
            .with_base_order(self.base_order)
    }

    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    pub fn is_date_column(&self, column: &str) -> bool {
        self.date_columns.contains(&column)
    }

    pub fn is_numeric_column(&self, column: &str) -> bool {
        self.numeric_columns.contains(&column)
    }

    /// Every facet declared and set to "all".
    pub fn filters(&self) -> FilterSpec {
        self.facets.iter().fold(FilterSpec::new(), |spec, f| {
            spec.with_facet(f.name, f.field, FilterValue::All)
        })
    }

    pub fn initial_view(&self, page_size: usize) -> Result<ViewState, TableError> {
        Ok(ViewState::new(self.filters(), SortSpec::none(), PageSpec::first(page_size)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.slug().parse::<EntityKind>().unwrap(), kind);
            assert_eq!(kind.schema().kind, kind);
        }
        assert!(matches!("flights".parse::<EntityKind>(), Err(AdminError::UnknownEntity(_))));
    }

    #[test]
    fn test_only_bookings_are_reversed() {
        for kind in EntityKind::ALL {
            let expected = if kind == EntityKind::Bookings {
                BaseOrder::Reversed
            } else {
                BaseOrder::AsFetched
            };
            assert_eq!(kind.schema().base_order, expected, "{}", kind);
        }
    }

    #[test]
    fn test_endpoint_uses_id_field() {
        let endpoint = EntityKind::CircuitTransfers.schema().endpoint();
        assert_eq!(
            endpoint.item_path("t-1"),
            "/circuit-transfers/circuit_transfer_id/t-1"
        );
        assert_eq!(EntityKind::Tickets.schema().endpoint().list_path(), "/stock-tickets");
    }

    #[test]
    fn test_initial_view_declares_all_facets() {
        let schema = EntityKind::Bookings.schema();
        let view = schema.initial_view(25).unwrap();
        assert_eq!(view.page, PageSpec::first(25).unwrap());
        assert_eq!(view.filters.facets.len(), 3);
        assert!(view.filters.is_unconstrained());
        assert_eq!(view.filters.facet("event").unwrap().field, "event_name");
    }

    #[test]
    fn test_table_config_numeric_columns() {
        let config = EntityKind::Tickets.schema().table_config();
        assert_eq!(config.column_kind("unit_cost"), waypoint_table::ColumnKind::Numeric);
        assert_eq!(config.column_kind("supplier"), waypoint_table::ColumnKind::Text);
    }

    #[test]
    fn test_serde_slug() {
        let kind: EntityKind = serde_json::from_str("\"circuit-transfers\"").unwrap();
        assert_eq!(kind, EntityKind::CircuitTransfers);
    }
}
