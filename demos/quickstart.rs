/// Quickstart example: public quotation calls, then authenticated calls when
/// `UPBIT_ACCESS_KEY` / `UPBIT_SECRET_KEY` are set.
use upbit_sdk::{CandleQuery, Credentials, UpbitApi};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api = UpbitApi::new()?;

    // 1. Market catalog
    let markets = api.market_all(true).await.into_result()?;
    let krw: Vec<_> = markets.iter().filter(|m| m.market.starts_with("KRW-")).collect();
    println!("{} markets, {} quoted in KRW", markets.len(), krw.len());
    for m in krw.iter().filter(|m| m.is_caution()) {
        println!("  caution: {} ({})", m.market, m.english_name);
    }

    // 2. Candles
    let day = api
        .candles_days(&CandleQuery::new("KRW-BTC").count(1))
        .await
        .into_result()?;
    println!(
        "KRW-BTC {}: open {} close {} ({:+.2}%)",
        day.candle_date_time_kst,
        day.opening_price,
        day.trade_price,
        day.change_rate * 100.0
    );

    let minutes = api
        .candles_minutes(5, &CandleQuery::new("KRW-BTC").count(12))
        .await;
    match minutes.error() {
        None => {
            for c in minutes.response().into_iter().flatten() {
                println!("  {} {}", c.candle_date_time_kst, c.trade_price);
            }
        }
        Some(e) => println!("minute candles failed (status {:?}): {e}", minutes.status_code()),
    }

    // 3. Account (needs credentials)
    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            println!("Skipping account calls: {e}");
            return Ok(());
        }
    };
    let api = api.with_credentials(credentials);

    for account in api.accounts().await.into_result()? {
        println!(
            "{}: balance {} locked {}",
            account.currency, account.balance, account.locked
        );
    }

    let chance = api.orders_chance("KRW", "BTC").await.into_result()?;
    println!(
        "KRW-BTC bid fee {} ask fee {}, min total {} {}",
        chance.bid_fee, chance.ask_fee, chance.market.bid.min_total, chance.market.bid.currency
    );

    Ok(())
}
