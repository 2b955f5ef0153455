// Loads a catalog and drives the suggestion engine the way the explore screen does
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use crane_suggestions::logging::init_tracing;
use crane_suggestions::{
    BuiltinSource, DestinationSource, DestinationStore, EngineConfig, JsonFileSource,
    SuggestionEngine, XmlFileSource,
};
use futures::future::join_all;
use std::sync::Arc;

fn source_for(path: Option<String>) -> Result<Box<dyn DestinationSource>> {
    let Some(path) = path else {
        return Ok(Box::new(BuiltinSource));
    };
    if path.ends_with(".json") {
        Ok(Box::new(JsonFileSource::new(path)))
    } else if path.ends_with(".xml") {
        Ok(Box::new(XmlFileSource::new(path)))
    } else {
        bail!("unsupported catalog file {}: expected .json or .xml", path)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let source = source_for(args.next())?;
    let config = match args.next() {
        Some(json) => EngineConfig::from_json_str(&json).context("invalid engine config")?,
        None => EngineConfig::default(),
    };

    let store = DestinationStore::load(source.as_ref())
        .await
        .with_context(|| format!("loading catalog from {}", source.describe()))?;
    let engine = SuggestionEngine::new(Arc::new(store), config);

    println!("Explore flights by destination:");
    for destination in engine.current_suggestions() {
        println!("  {}", destination);
    }

    // Typing in the destination field while changing the party size
    let tasks = vec![
        engine.on_people_count_changed(2),
        engine.on_destination_text_changed("Ma"),
        engine.on_people_count_changed(3),
    ];
    for (ticket, outcome) in join_all(tasks.into_iter().map(|task| {
        let ticket = task.ticket();
        async move { (ticket, task.wait().await) }
    }))
    .await
    {
        println!("trigger #{}: {:?}", ticket, outcome);
    }

    let snapshot = engine.snapshot();
    println!("Suggestions after {:?}:", snapshot.trigger);
    for destination in &snapshot.destinations {
        println!("  {}", destination);
    }

    engine.on_people_count_changed(engine.config().max_party_size + 1).wait().await;
    println!(
        "Party above {}: {} suggestions",
        engine.config().max_party_size,
        engine.current_suggestions().len()
    );

    let check_in = NaiveDate::from_ymd_opt(2025, 6, 11).context("bad check-in date")?;
    let check_out = NaiveDate::from_ymd_opt(2025, 6, 14).context("bad check-out date")?;
    engine.on_day_selected(check_in);
    let dates = engine.on_day_selected(check_out);
    println!("Dates: {} ({} nights)", dates, dates.nights().unwrap_or(0));

    println!("Sleep: {} properties, Eat: {} restaurants", engine.hotels().len(), engine.restaurants().len());
    println!("{:?}", engine.stats());
    Ok(())
}
