//! # Operator Console
//!
//! Line-oriented front end for the order desk. Every input line is one
//! discrete action; what a bare line means depends on the workflow state.
//!
//! ## Input Interpretation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  State                         Prompt            Bare line means        │
//! │  ────────────────────────────  ────────────────  ─────────────────────  │
//! │  idle / not_found              code>             product code           │
//! │  / persist_failed                                                       │
//! │  resolved / rejected           qty>              quantity               │
//! │  validated                     confirm [y/n]>    y / n (or a new qty)   │
//! │  after :scan                   scan>             code, with timeout     │
//! │                                                                         │
//! │  Lines starting with ':' are commands in every state.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `:scan` arms the identifier source: if no code arrives within the
//! configured scanner timeout, the cycle ends as "no product code detected".
//! Typing a code at the `code>` prompt never times out.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::TerminalConfig;
use crate::desk::{OrderDesk, QuantityPreview, Receipt};
use crate::error::TerminalError;
use janorder_core::clock::Clock;
use janorder_core::ports::{CatalogSource, OrderSink};
use janorder_core::{
    OrderError, ProductRecord, QuantityRejection, ScanOutcome, StateKind, Symbology, ORDER_COLUMNS,
};
use janorder_db::{OrderHistoryEntry, OrderHistoryRepository};

/// Rows shown by `:history`.
pub const HISTORY_LIMIT: u32 = 20;

const HELP: &str = "\
Commands:
  <code>            Look up a product (at the code> prompt)
  <number>          Order quantity (at the qty> prompt)
  y / n             Place or cancel the order
  :scan             Wait for a scanned code (uses the scanner timeout)
  :history [json]   Show recent orders
  :reset            Abandon the current order
  :help             Show this help
  :quit             Exit";

// =============================================================================
// Command Parsing
// =============================================================================

/// What a bare (non-command) line is taken to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expecting {
    Code,
    Quantity,
    Confirmation,
}

impl Expecting {
    pub fn for_state(kind: StateKind) -> Self {
        match kind {
            StateKind::Resolved | StateKind::Rejected => Expecting::Quantity,
            StateKind::Validated => Expecting::Confirmation,
            _ => Expecting::Code,
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            Expecting::Code => "code> ",
            Expecting::Quantity => "qty> ",
            Expecting::Confirmation => "confirm [y/n]> ",
        }
    }
}

/// One parsed operator action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Code(String),
    Scan,
    Quantity(i64),
    Confirm(bool),
    History { json: bool },
    Reset,
    Help,
    Quit,
    Empty,
    /// Unusable input, with the message to show.
    Invalid(String),
}

pub fn parse_command(line: &str, expecting: Expecting) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    if let Some(rest) = trimmed.strip_prefix(':') {
        let mut words = rest.split_whitespace();
        return match (words.next(), words.next(), words.next()) {
            (Some("scan" | "s"), None, None) => Command::Scan,
            (Some("history" | "h"), None, None) => Command::History { json: false },
            (Some("history" | "h"), Some("json"), None) => Command::History { json: true },
            (Some("reset" | "r"), None, None) => Command::Reset,
            (Some("help" | "?"), None, None) => Command::Help,
            (Some("quit" | "q" | "exit"), None, None) => Command::Quit,
            _ => Command::Invalid(format!("Unknown command '{trimmed}'. Type :help for the list.")),
        };
    }

    match expecting {
        Expecting::Code => Command::Code(trimmed.to_string()),
        Expecting::Quantity => parse_quantity(trimmed),
        Expecting::Confirmation => match trimmed.to_ascii_lowercase().as_str() {
            "y" | "yes" => Command::Confirm(true),
            "n" | "no" => Command::Confirm(false),
            _ if trimmed.parse::<i64>().is_ok() => parse_quantity(trimmed),
            _ => Command::Invalid("Answer y to place the order or n to cancel it.".to_string()),
        },
    }
}

fn parse_quantity(text: &str) -> Command {
    // a keyboard-wedge scanner fires at whatever prompt is showing
    if let Some(symbology) = Symbology::detect(text) {
        return Command::Invalid(format!(
            "'{text}' looks like a product code ({symbology}), not a quantity. \
             Use :reset to drop this order, then scan the new product."
        ));
    }
    match text.parse::<i64>() {
        Ok(quantity) => Command::Quantity(quantity),
        Err(_) => Command::Invalid(format!("'{text}' is not a whole number. Enter the order quantity.")),
    }
}

// =============================================================================
// Messages
// =============================================================================

/// Operator-facing text for an order outcome.
///
/// The two quantity rejections get different advice: a non-positive entry
/// needs a positive number, a non-multiple needs rounding to the unit.
pub fn operator_message(err: &OrderError) -> String {
    match err {
        OrderError::InvalidQuantity(QuantityRejection::NonPositive { .. }) => {
            "✗ Quantity must be greater than zero.".to_string()
        }
        OrderError::InvalidQuantity(QuantityRejection::NotAMultiple {
            quantity,
            min_order_unit,
        }) => {
            let lower = quantity / min_order_unit * min_order_unit;
            let upper = lower + min_order_unit;
            if lower > 0 {
                format!("✗ Quantity must be a multiple of {min_order_unit}. Try {lower} or {upper}.")
            } else {
                format!("✗ Quantity must be a multiple of {min_order_unit}. Try {upper}.")
            }
        }
        OrderError::NotFound { code: Some(_) } => format!("✗ {err}. Scan or type another code."),
        OrderError::NotFound { code: None } => format!("✗ {err}. Try again or type the code."),
        OrderError::TotalOverflow { .. } => format!("✗ {err}. Enter a smaller quantity."),
        OrderError::CatalogUnavailable(_) => format!("✗ {err}. Check the database and try again."),
        OrderError::PersistFailed(_) => {
            format!("✗ {err}. Nothing was saved; scan the product again to resubmit.")
        }
        _ => format!("✗ {err}"),
    }
}

fn describe_product(product: &ProductRecord, config: &TerminalConfig) -> String {
    format!(
        "{} ({})  unit price {}  minimum order unit {}",
        product.name,
        product.code,
        config.format_currency(product.unit_price),
        product.min_order_unit
    )
}

fn describe_preview(preview: &QuantityPreview, config: &TerminalConfig) -> String {
    format!(
        "{} x {} = {}  Place order? [y/n]",
        preview.quantity,
        config.format_currency(preview.unit_price),
        config.format_currency(preview.total_price)
    )
}

fn describe_receipt(receipt: &Receipt, config: &TerminalConfig) -> String {
    format!(
        "✓ Order recorded: {}  {}  {}  x{}  {}",
        receipt.timestamp,
        receipt.code,
        receipt.product_name,
        receipt.quantity,
        config.format_currency(receipt.total_price)
    )
}

fn history_table(entries: &[OrderHistoryEntry], config: &TerminalConfig) -> String {
    if entries.is_empty() {
        return "No orders recorded yet.".to_string();
    }

    let mut out = format!(
        "{:<19}  {:<13}  {:<24}  {:>8}  {:>12}",
        ORDER_COLUMNS[0], ORDER_COLUMNS[1], ORDER_COLUMNS[2], ORDER_COLUMNS[3], ORDER_COLUMNS[4]
    );
    for entry in entries {
        out.push_str(&format!(
            "\n{:<19}  {:<13}  {:<24}  {:>8}  {:>12}",
            entry.timestamp.to_string(),
            entry.code,
            entry.product_name,
            entry.quantity,
            config.format_currency(entry.total_price)
        ));
    }
    out
}

fn history_json(entries: &[OrderHistoryEntry]) -> String {
    entries
        .iter()
        .map(|entry| serde_json::to_string(entry).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}")))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Session Loop
// =============================================================================

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

/// Runs the console until `:quit` or end of input.
pub async fn run_session<R, W, C, O, K>(
    desk: &mut OrderDesk<C, O, K>,
    history: &OrderHistoryRepository,
    config: &TerminalConfig,
    input: R,
    mut output: W,
) -> Result<(), TerminalError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: CatalogSource,
    O: OrderSink,
    K: Clock,
{
    let mut lines = input.lines();
    let mut armed = false;

    say(
        &mut output,
        &format!(
            "JAN Order Desk  catalog '{}'  ledger '{}'  (:help for commands)",
            desk.catalog_id(),
            history.ledger_id()
        ),
    )
    .await?;

    loop {
        let expecting = Expecting::for_state(desk.kind());
        let prompt = if armed { "scan> " } else { expecting.prompt() };
        output.write_all(prompt.as_bytes()).await?;
        output.flush().await?;

        if armed {
            armed = false;
            let received = match config.scan_timeout() {
                Some(limit) => match tokio::time::timeout(limit, lines.next_line()).await {
                    Ok(line) => line?,
                    Err(_) => {
                        say(&mut output, "").await?;
                        let outcome = desk.scan(ScanOutcome::NoCodeDetected).await;
                        report_scan(&mut output, outcome, config).await?;
                        continue;
                    }
                },
                None => lines.next_line().await?,
            };
            let Some(line) = received else { break };
            let outcome = desk.scan(ScanOutcome::detected(line)).await;
            report_scan(&mut output, outcome, config).await?;
            continue;
        }

        let Some(line) = lines.next_line().await? else { break };

        match parse_command(&line, expecting) {
            Command::Empty => {}
            Command::Code(code) => {
                let outcome = desk.scan(ScanOutcome::detected(code)).await;
                report_scan(&mut output, outcome, config).await?;
            }
            Command::Scan => {
                armed = true;
                let hint = match config.scan_timeout() {
                    Some(limit) => format!("Waiting for a scan ({}s)...", limit.as_secs()),
                    None => "Waiting for a scan...".to_string(),
                };
                say(&mut output, &hint).await?;
            }
            Command::Quantity(quantity) => match desk.enter_quantity(quantity) {
                Ok(preview) => say(&mut output, &describe_preview(&preview, config)).await?,
                Err(e) => say(&mut output, &operator_message(&e)).await?,
            },
            Command::Confirm(true) => match desk.place_order().await {
                Ok(receipt) => say(&mut output, &describe_receipt(&receipt, config)).await?,
                Err(e) => say(&mut output, &operator_message(&e)).await?,
            },
            Command::Confirm(false) => {
                desk.reset();
                say(&mut output, "Order cancelled.").await?;
            }
            Command::History { json } => match history.list_recent(HISTORY_LIMIT).await {
                Ok(entries) if json => say(&mut output, &history_json(&entries)).await?,
                Ok(entries) => say(&mut output, &history_table(&entries, config)).await?,
                Err(e) => say(&mut output, &format!("✗ Cannot read order history: {e}")).await?,
            },
            Command::Reset => {
                desk.reset();
                say(&mut output, "Cleared.").await?;
            }
            Command::Help => say(&mut output, HELP).await?,
            Command::Quit => break,
            Command::Invalid(message) => say(&mut output, &message).await?,
        }
    }

    say(&mut output, "Bye.").await?;
    Ok(())
}

async fn report_scan<W: AsyncWrite + Unpin>(
    output: &mut W,
    outcome: Result<ProductRecord, OrderError>,
    config: &TerminalConfig,
) -> std::io::Result<()> {
    match outcome {
        Ok(product) => say(output, &describe_product(&product, config)).await,
        Err(e) => say(output, &operator_message(&e)).await,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use janorder_core::clock::SystemClock;
    use janorder_core::Money;
    use janorder_db::{CatalogRepository, Database, DbConfig};
    use std::time::Duration;
    use tokio::io::BufReader;

    #[test]
    fn test_parse_commands_everywhere() {
        for expecting in [Expecting::Code, Expecting::Quantity, Expecting::Confirmation] {
            assert_eq!(parse_command(":quit", expecting), Command::Quit);
            assert_eq!(parse_command(" :history json ", expecting), Command::History { json: true });
            assert_eq!(parse_command(":h", expecting), Command::History { json: false });
            assert_eq!(parse_command(":reset", expecting), Command::Reset);
            assert_eq!(parse_command(":scan", expecting), Command::Scan);
            assert_eq!(parse_command("   ", expecting), Command::Empty);
            assert!(matches!(parse_command(":frobnicate", expecting), Command::Invalid(_)));
        }
    }

    #[test]
    fn test_parse_depends_on_state() {
        assert_eq!(
            parse_command("4901234567894\r", Expecting::Code),
            Command::Code("4901234567894".to_string())
        );
        assert_eq!(parse_command("10", Expecting::Quantity), Command::Quantity(10));
        assert_eq!(parse_command("-5", Expecting::Quantity), Command::Quantity(-5));
        assert!(matches!(parse_command("ten", Expecting::Quantity), Command::Invalid(_)));
        assert_eq!(parse_command("Y", Expecting::Confirmation), Command::Confirm(true));
        assert_eq!(parse_command("no", Expecting::Confirmation), Command::Confirm(false));
        assert_eq!(parse_command("15", Expecting::Confirmation), Command::Quantity(15));
        assert!(matches!(parse_command("maybe", Expecting::Confirmation), Command::Invalid(_)));
    }

    #[test]
    fn test_scanned_code_is_not_a_quantity() {
        for expecting in [Expecting::Quantity, Expecting::Confirmation] {
            match parse_command("4901234567894", expecting) {
                Command::Invalid(message) => {
                    assert!(message.contains("product code (EAN-13)"));
                    assert!(message.contains(":reset"));
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
        assert!(matches!(parse_command("96385074", Expecting::Quantity), Command::Invalid(_)));
        assert_eq!(parse_command("1000", Expecting::Quantity), Command::Quantity(1000));
    }

    #[test]
    fn test_expecting_follows_state() {
        assert_eq!(Expecting::for_state(StateKind::Idle), Expecting::Code);
        assert_eq!(Expecting::for_state(StateKind::NotFound), Expecting::Code);
        assert_eq!(Expecting::for_state(StateKind::PersistFailed), Expecting::Code);
        assert_eq!(Expecting::for_state(StateKind::Rejected), Expecting::Quantity);
        assert_eq!(Expecting::for_state(StateKind::Validated), Expecting::Confirmation);
    }

    #[test]
    fn test_quantity_messages_are_distinct() {
        let non_positive = operator_message(&OrderError::InvalidQuantity(QuantityRejection::NonPositive {
            quantity: 0,
        }));
        let not_multiple = operator_message(&OrderError::InvalidQuantity(QuantityRejection::NotAMultiple {
            quantity: 7,
            min_order_unit: 5,
        }));
        let below_unit = operator_message(&OrderError::InvalidQuantity(QuantityRejection::NotAMultiple {
            quantity: 3,
            min_order_unit: 5,
        }));

        assert_eq!(non_positive, "✗ Quantity must be greater than zero.");
        assert_eq!(not_multiple, "✗ Quantity must be a multiple of 5. Try 5 or 10.");
        assert_eq!(below_unit, "✗ Quantity must be a multiple of 5. Try 5.");
    }

    async fn seeded() -> (Database, CatalogRepository) {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        catalog
            .insert(
                "product-master",
                &ProductRecord::new("4901234567894", "Widget", Money::from_minor(120), 5).unwrap(),
            )
            .await
            .unwrap();
        (db, catalog)
    }

    #[tokio::test]
    async fn test_session_places_widget_order() {
        let (db, catalog) = seeded().await;
        let config = TerminalConfig::default();
        let history = db.orders("order-history");
        let mut desk = OrderDesk::new(catalog, db.orders("order-history"), SystemClock::new(), "product-master");

        let input: &[u8] = b"0000000000000\n4901234567894\n7\n0\n10\ny\n:history\n:history json\n:quit\n";
        let mut output = Vec::new();
        run_session(&mut desk, &history, &config, BufReader::new(input), &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("No product found for code 0000000000000"));
        assert!(text.contains("Widget (4901234567894)  unit price ¥120  minimum order unit 5"));
        assert!(text.contains("Quantity must be a multiple of 5. Try 5 or 10."));
        assert!(text.contains("Quantity must be greater than zero."));
        assert!(text.contains("10 x ¥120 = ¥1,200"));
        assert!(text.contains("✓ Order recorded"));
        assert!(text.contains("\"productName\":\"Widget\",\"quantity\":10,\"totalPrice\":1200"));
        assert!(text.ends_with("Bye.\n"));

        assert_eq!(history.count().await.unwrap(), 1);
        assert_eq!(desk.kind(), StateKind::Idle);
    }

    #[tokio::test]
    async fn test_session_cancel_and_eof() {
        let (db, catalog) = seeded().await;
        let config = TerminalConfig::default();
        let history = db.orders("order-history");
        let mut desk = OrderDesk::new(catalog, db.orders("order-history"), SystemClock::new(), "product-master");

        // no :quit, input just ends
        let input: &[u8] = b"4901234567894\n10\nn\n:history\n";
        let mut output = Vec::new();
        run_session(&mut desk, &history, &config, BufReader::new(input), &mut output)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Order cancelled."));
        assert!(text.contains("No orders recorded yet."));
        assert_eq!(history.count().await.unwrap(), 0);
        assert_eq!(desk.kind(), StateKind::Idle);
    }

    #[tokio::test]
    async fn test_armed_scan_times_out() {
        let (db, catalog) = seeded().await;
        let mut config = TerminalConfig::default();
        config.scanner.timeout_secs = Some(1);
        let history = db.orders("order-history");
        let mut desk = OrderDesk::new(catalog, db.orders("order-history"), SystemClock::new(), "product-master");

        let (mut operator, terminal) = tokio::io::duplex(256);
        let typing = tokio::spawn(async move {
            operator.write_all(b":scan\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(1500)).await;
            operator.write_all(b":quit\n").await.unwrap();
            operator
        });

        let mut output = Vec::new();
        run_session(&mut desk, &history, &config, BufReader::new(terminal), &mut output)
            .await
            .unwrap();
        let _ = typing.await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Waiting for a scan (1s)..."));
        assert!(text.contains("No product code detected. Try again or type the code."));
        assert_eq!(desk.kind(), StateKind::NotFound);
    }
}
