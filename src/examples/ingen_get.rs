use ingen_remote::*;

fn main() -> anyhow::Result<()> {
    logging::init_subscriber("info");

    let config = ClientConfig::from_env();
    let subject = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ingen:/main".to_string());

    println!("Connecting to {}", config.uri);
    let mut ingen = Remote::with_config(&config)?;

    println!("\nGET {}", subject);
    let payload = ingen.get(&subject)?;
    println!("Reply payload ({} triples):", payload.len());
    println!("{}", turtle::to_string(&payload)?);

    println!("Local model:");
    for t in ingen.model().graph() {
        let predicate = ingen
            .prefixes()
            .abbreviate(&t.predicate)
            .unwrap_or_else(|| format!("<{}>", t.predicate));
        println!("   {} {} {} .", t.subject, predicate, t.object);
    }

    println!("\nAs JSON:");
    println!("{}", serde_json::to_string_pretty(ingen.model().graph())?);

    Ok(())
}
