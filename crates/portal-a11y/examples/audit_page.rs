//! Example: audit a request page snapshot
//!
//! Runs the palette and touch target audits over a small page and prints
//! both reports as JSON. Set `RUST_LOG=portal_a11y=debug` to see the
//! engine's own tracing.

use portal_a11y::{
    audit_palette, ColorPair, ComplianceConfig, ComplianceRuntime, ElementDescriptor, ElementTree,
    KeyEvent, KeyboardShortcut,
};
use tracing_subscriber::EnvFilter;

const PALETTE: &str = r##"[
    { "name": "primary-button", "foreground": "#ffffff", "background": "#1c8282" },
    { "name": "body-text", "foreground": "#1f2937", "background": "#ffffff" },
    { "name": "muted-caption", "foreground": "#9ca3af", "background": "#ffffff" },
    { "name": "hero-heading", "foreground": "#ffffff", "background": "#1c8282", "large_text": true }
]"##;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ComplianceConfig::from_json_str(r#"{ "announcer": { "polite_delay_ms": 1500 } }"#)?;
    let mut runtime = ComplianceRuntime::new(config)?;

    let mut tree = ElementTree::new();
    let main = tree.append(tree.root(), ElementDescriptor::new("main"))?;
    tree.append(main, ElementDescriptor::new("a").with_href("/catalog").with_text("Service catalog").with_size(140.0, 44.0))?;
    tree.append(main, ElementDescriptor::new("button").with_label("Close").with_text("×").with_size(24.0, 24.0))?;
    tree.append(main, ElementDescriptor::new("input").with_label("Search services").with_size(240.0, 0.0))?;

    let pairs: Vec<ColorPair> = serde_json::from_str(PALETTE)?;
    let palette = audit_palette(&pairs);
    println!("{}", serde_json::to_string_pretty(&palette)?);

    let report = runtime.audit_touch_targets(&tree, tree.root());
    println!("{}", serde_json::to_string_pretty(&report)?);

    let chord = KeyboardShortcut::parse("Alt+1").ok_or_else(|| anyhow::anyhow!("invalid chord"))?;
    runtime.shortcuts_mut().register(chord, "Navigate to service catalog", || {})?;
    for (chord, description) in runtime.shortcuts().help_entries() {
        println!("{chord:>8}  {description}");
    }

    runtime.handle_key(&tree, &KeyEvent::new("1").alt().on(main), None, 0);
    println!("live region: {:?}", runtime.announcer().message());
    runtime.tick(1500);
    println!("live region after 1500ms: {:?}", runtime.announcer().message());

    Ok(())
}
