//! One-shot fetch-and-broadcast run, for cron-style schedulers.
//! Prints the job response as JSON; exits 1 when the run failed.

use promobot::jobs::run_fetch_job;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let ctx = promobot::bootstrap()?;

    let resp = run_fetch_job(&ctx).await;
    println!("{}", serde_json::to_string(&resp)?);

    if !resp.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}
