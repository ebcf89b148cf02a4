use ingen_remote::*;

/// Build a tiny graph: one block with its output wired to the main graph's output.
fn wire(ingen: &mut impl Interface, graph: &str, value: &str) -> Result<()> {
    let block = format!("{}/amp", graph);

    ingen.put(
        &block,
        "a ingen:Block ;\n\t\tlv2:prototype <http://lv2plug.in/plugins/eg-amp>",
    )?;
    ingen.set(
        &format!("{}/gain", block),
        value,
        "-6.0",
    )?;
    ingen.connect(&format!("{}/out", block), &format!("{}/audio_out", graph))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::init_subscriber("info");

    let config = ClientConfig::from_env();
    let graph = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ingen:/main".to_string());

    println!("Connecting to {}", config.uri);
    let mut ingen = Remote::with_config(&config)?;

    let value = ingen
        .prefixes()
        .expand("ingen:value")
        .ok_or_else(|| anyhow::anyhow!("no `ingen` prefix bound"))?;

    match wire(&mut ingen, &graph, &value) {
        Ok(()) => println!("Wired {}/amp", graph),
        Err(e @ Error::Application { .. }) => {
            eprintln!("Server refused: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    println!("\nCleaning up");
    ingen.disconnect(&format!("{}/amp/out", graph), &format!("{}/audio_out", graph))?;
    ingen.delete(&format!("{}/amp", graph))?;

    let payload = ingen.get(&graph)?;
    println!("{} now has {} reported triples", graph, payload.len());
    ingen.close();

    Ok(())
}
