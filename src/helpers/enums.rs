use std::{fmt, io, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
    Closed,
    Liquidated,
}

impl TradeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeStatus::Open => "OPEN",
            TradeStatus::Closed => "CLOSED",
            TradeStatus::Liquidated => "LIQUIDATED",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<TradeStatus> for String {
    fn from(value: TradeStatus) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for TradeStatus {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<TradeStatus, Self::Err> {
        match value {
            "OPEN" => Ok(TradeStatus::Open),
            "CLOSED" => Ok(TradeStatus::Closed),
            "LIQUIDATED" => Ok(TradeStatus::Liquidated),
            _ => Err(io::Error::other("Trade status not supported")),
        }
    }
}

/// Kinds of entries in the trade lifecycle log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    PositionOpened,
    SLTPPlaced,
    SLRevised,
    TPRevised,
    MovedToBreakeven,
    TPHit,
    TrailingActivated,
    TrailingUpdated,
    PositionClosed,
    OrderCancelled,
    ExternalClose,
    SLHit,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PositionOpened => "position_opened",
            EventType::SLTPPlaced => "sltp_placed",
            EventType::SLRevised => "sl_revised",
            EventType::TPRevised => "tp_revised",
            EventType::MovedToBreakeven => "moved_to_breakeven",
            EventType::TPHit => "tp_hit",
            EventType::TrailingActivated => "trailing_activated",
            EventType::TrailingUpdated => "trailing_updated",
            EventType::PositionClosed => "position_closed",
            EventType::OrderCancelled => "order_cancelled",
            EventType::ExternalClose => "external_close",
            EventType::SLHit => "sl_hit",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for EventType {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<EventType, Self::Err> {
        match value {
            "position_opened" => Ok(EventType::PositionOpened),
            "sltp_placed" => Ok(EventType::SLTPPlaced),
            "sl_revised" => Ok(EventType::SLRevised),
            "tp_revised" => Ok(EventType::TPRevised),
            "moved_to_breakeven" => Ok(EventType::MovedToBreakeven),
            "tp_hit" => Ok(EventType::TPHit),
            "trailing_activated" => Ok(EventType::TrailingActivated),
            "trailing_updated" => Ok(EventType::TrailingUpdated),
            "position_closed" => Ok(EventType::PositionClosed),
            "order_cancelled" => Ok(EventType::OrderCancelled),
            "external_close" => Ok(EventType::ExternalClose),
            "sl_hit" => Ok(EventType::SLHit),
            _ => Err(io::Error::other("Lifecycle event type not supported")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Ginie,
    Trailing,
    Manual,
    Binance,
    External,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::Ginie => "ginie",
            EventSource::Trailing => "trailing",
            EventSource::Manual => "manual",
            EventSource::Binance => "binance",
            EventSource::External => "external",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<EventSource> for String {
    fn from(value: EventSource) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for EventSource {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<EventSource, Self::Err> {
        match value {
            "ginie" => Ok(EventSource::Ginie),
            "trailing" => Ok(EventSource::Trailing),
            "manual" => Ok(EventSource::Manual),
            "binance" => Ok(EventSource::Binance),
            "external" => Ok(EventSource::External),
            _ => Err(io::Error::other("Lifecycle event source not supported")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementStatus {
    Pending,
    Invoiced,
    Paid,
    Failed,
    Waived,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Invoiced => "invoiced",
            SettlementStatus::Paid => "paid",
            SettlementStatus::Failed => "failed",
            SettlementStatus::Waived => "waived",
        }
    }

    /// Paid and waived periods are closed and never change again.
    pub fn is_final(&self) -> bool {
        matches!(self, SettlementStatus::Paid | SettlementStatus::Waived)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<SettlementStatus> for String {
    fn from(value: SettlementStatus) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for SettlementStatus {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<SettlementStatus, Self::Err> {
        match value {
            "pending" => Ok(SettlementStatus::Pending),
            "invoiced" => Ok(SettlementStatus::Invoiced),
            "paid" => Ok(SettlementStatus::Paid),
            "failed" => Ok(SettlementStatus::Failed),
            "waived" => Ok(SettlementStatus::Waived),
            _ => Err(io::Error::other("Settlement status not supported")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_parses_its_own_name() {
        for event in [
            EventType::PositionOpened,
            EventType::SLTPPlaced,
            EventType::SLRevised,
            EventType::TPRevised,
            EventType::MovedToBreakeven,
            EventType::TPHit,
            EventType::TrailingActivated,
            EventType::TrailingUpdated,
            EventType::PositionClosed,
            EventType::OrderCancelled,
            EventType::ExternalClose,
            EventType::SLHit,
        ] {
            assert_eq!(EventType::from_str(event.as_str()).unwrap(), event);
            assert_eq!(event.to_string(), event.as_str());
        }
        assert_eq!(
            EventType::from_str("order_cancelled").unwrap(),
            EventType::OrderCancelled
        );
        assert!(EventType::from_str("sl_moved").is_err());
    }

    #[test]
    fn event_source_parses_its_own_name() {
        for source in [
            EventSource::Ginie,
            EventSource::Trailing,
            EventSource::Manual,
            EventSource::Binance,
            EventSource::External,
        ] {
            assert_eq!(EventSource::from_str(source.as_str()).unwrap(), source);
        }
        assert_eq!(String::from(EventSource::Binance), "binance");
        assert!(EventSource::from_str("exchange").is_err());
    }

    #[test]
    fn trade_status_is_upper_case() {
        assert_eq!(TradeStatus::Liquidated.to_string(), "LIQUIDATED");
        assert!(TradeStatus::from_str("open").is_err());
    }

    #[test]
    fn only_paid_and_waived_are_final() {
        assert!(SettlementStatus::Paid.is_final());
        assert!(SettlementStatus::Waived.is_final());
        assert!(!SettlementStatus::Invoiced.is_final());
        assert!(!SettlementStatus::Pending.is_final());
    }
}
