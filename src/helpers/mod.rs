mod enums;
mod settlement;

pub use enums::{EventSource, EventType, SettlementStatus, TradeStatus};
pub use settlement::{
    local_date, needs_settlement, needs_settlement_at, resolve_timezone,
};
