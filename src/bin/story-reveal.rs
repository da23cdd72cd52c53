use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use story_reveal::{
    CapabilitySlot, ContentLoader, ContentSource, ElementIdSeq, HeadlessScroller, HttpFetcher,
    HttpFetcherOpts, PanelSettings, PreviewMode, Rect, RefreshDebouncer, RevealBinder,
    ScrollCapability, StorySettings, StoryPanel, StyleBuffer, StyleSink,
};

const LINE_HEIGHT_PX: f64 = 32.0;
const PANEL_WIDTH_PX: f64 = 640.0;
const PANEL_GAP_PX: f64 = 120.0;

#[derive(Parser, Debug)]
#[command(name = "story-reveal", version)]
struct Cli {
    /// Log at debug level. `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tokens of a text as JSON lines.
    Segment(SegmentArgs),
    /// Resolve one content source and print the document as JSON.
    Load(LoadArgs),
    /// Render the panels of a settings file as plain text.
    Show(ShowArgs),
    /// Scroll through the panels of a settings file and print reveal state.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SegmentArgs {
    /// Input text file, or `-` for stdin.
    #[arg(default_value = "-")]
    input: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Lines,
    Joined,
}

impl From<ModeArg> for PreviewMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Lines => PreviewMode::Lines,
            ModeArg::Joined => PreviewMode::Joined,
        }
    }
}

#[derive(Parser, Debug)]
struct LoadArgs {
    /// Remote document id. Omit (or pass the placeholder) to use the fallback.
    #[arg(long)]
    doc_id: Option<String>,

    /// Embedded fallback text.
    #[arg(long, conflicts_with = "fallback_file")]
    fallback_text: Option<String>,

    /// File holding the embedded fallback text.
    #[arg(long)]
    fallback_file: Option<PathBuf>,

    /// How the collapsed preview is joined.
    #[arg(long, value_enum, default_value_t = ModeArg::Lines)]
    mode: ModeArg,

    /// Export endpoint base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    /// Settings JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Only this panel.
    #[arg(long)]
    panel: Option<String>,

    /// Toggle every panel once before rendering.
    #[arg(long, default_value_t = false)]
    expand: bool,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Settings JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 800.0)]
    viewport: f64,

    /// Number of scroll steps from the top to the end of the page.
    #[arg(long, default_value_t = 10)]
    steps: u32,

    /// Seconds of smoothing time that pass after each step.
    #[arg(long, default_value_t = 0.5)]
    dt: f64,

    /// Toggle every panel once before scrolling.
    #[arg(long, default_value_t = false)]
    expand: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Segment(args) => cmd_segment(args),
        Command::Load(args) => cmd_load(args).await,
        Command::Show(args) => cmd_show(args).await,
        Command::Simulate(args) => cmd_simulate(args).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = if verbose > 0 {
        "story_reveal=debug"
    } else {
        "story_reveal=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).context("read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn cmd_segment(args: SegmentArgs) -> anyhow::Result<()> {
    let text = read_input(&args.input)?;
    let mut out = std::io::stdout().lock();
    for token in story_reveal::segment(&text) {
        serde_json::to_writer(&mut out, &token)?;
        writeln!(out)?;
    }
    Ok(())
}

async fn cmd_load(args: LoadArgs) -> anyhow::Result<()> {
    let source = ContentSource::from_optional(args.doc_id.as_deref())?;
    let fallback = match (&args.fallback_text, &args.fallback_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_input(path)?,
        (None, None) => String::new(),
    };

    let mut opts = HttpFetcherOpts {
        timeout: Duration::from_millis(args.timeout_ms),
        ..HttpFetcherOpts::default()
    };
    if let Some(base_url) = args.base_url {
        opts.base_url = base_url;
    }

    let loader = ContentLoader::new(HttpFetcher::new(opts)?);
    let doc = loader.resolve(&source, &fallback, args.mode.into()).await;
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

struct Page {
    panels: Vec<(String, StoryPanel<HttpFetcher>)>,
}

impl Page {
    async fn load(
        settings: &StorySettings,
        wanted: Option<&str>,
        reveal: Option<(&RevealBinder, &Arc<StyleBuffer>)>,
    ) -> anyhow::Result<Self> {
        let loader = Arc::new(ContentLoader::new(HttpFetcher::new(
            settings.fetch.http_opts(),
        )?));

        let selected: Vec<&PanelSettings> = match wanted {
            Some(name) => vec![
                settings
                    .panel(name)
                    .with_context(|| format!("no panel named '{name}'"))?,
            ],
            None => settings.panels.iter().collect(),
        };

        let ids = ElementIdSeq::default();
        let mut panels = Vec::with_capacity(selected.len());
        for ps in selected {
            let fallback = settings.fallback_text(ps)?;
            let mut panel = StoryPanel::new(
                ps.panel_config(),
                ps.source()?,
                fallback,
                Arc::clone(&loader),
                &ids,
            )
            .with_refresh_debouncer(RefreshDebouncer::new(settings.fetch.refresh_debounce()));
            if let Some((binder, styles)) = reveal {
                let sink: Arc<dyn StyleSink> = styles.clone();
                panel.attach_reveal(binder.clone(), sink)?;
            }
            panel
                .load()
                .await
                .with_context(|| format!("load panel '{}'", ps.name))?;
            panels.push((ps.name.clone(), panel));
        }
        Ok(Self { panels })
    }

    fn expand_all(&mut self) -> anyhow::Result<()> {
        for (name, panel) in &mut self.panels {
            panel
                .toggle()
                .with_context(|| format!("toggle panel '{name}'"))?;
        }
        Ok(())
    }

    /// Stack containers below the fold. Returns the page height.
    fn lay_out(&self, scroller: &HeadlessScroller, viewport: f64) -> f64 {
        let mut y = viewport;
        for (_, panel) in &self.panels {
            let lines = panel
                .visible_text()
                .map_or(1, |text| text.lines().count().max(1));
            let height = lines as f64 * LINE_HEIGHT_PX;
            scroller.set_layout(
                panel.container(),
                Rect::new(0.0, y, PANEL_WIDTH_PX, y + height),
            );
            y += height + PANEL_GAP_PX;
        }
        y
    }

    fn unmount(&mut self) {
        for (_, panel) in &mut self.panels {
            panel.unmount();
        }
    }
}

async fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let settings = StorySettings::from_path(&args.in_path)?;
    let mut page = Page::load(&settings, args.panel.as_deref(), None).await?;
    if args.expand {
        page.expand_all()?;
    }
    for (name, panel) in &page.panels {
        println!("== {name}");
        print!("{}", panel.render());
    }
    page.unmount();
    Ok(())
}

async fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.viewport.is_finite() && args.viewport > 0.0,
        "viewport must be > 0"
    );
    anyhow::ensure!(args.steps > 0, "steps must be > 0");

    let settings = StorySettings::from_path(&args.in_path)?;

    let scroller = Arc::new(HeadlessScroller::new(args.viewport));
    let slot = CapabilitySlot::new();
    let capability: Arc<dyn ScrollCapability> = scroller.clone();
    slot.provide(capability);
    let binder = RevealBinder::when_ready(&slot, settings.fetch.capability_wait())
        .await
        .context("scroll capability never became ready")?;
    let styles = Arc::new(StyleBuffer::new());

    let mut page = Page::load(&settings, None, Some((&binder, &styles))).await?;
    if args.expand {
        page.expand_all()?;
    }
    let page_height = page.lay_out(&scroller, args.viewport);
    binder.refresh();

    let mut out = std::io::stdout().lock();
    for step in 0..=args.steps {
        let scroll_y = page_height * f64::from(step) / f64::from(args.steps);
        scroller.scroll_to(scroll_y);
        scroller.tick(args.dt);

        for (name, panel) in &page.panels {
            let view = panel.render();
            let Some(ready) = view.as_ready() else {
                continue;
            };
            let words: Vec<_> = ready
                .word_elements()
                .into_iter()
                .filter_map(|w| styles.token(w))
                .collect();
            let line = serde_json::json!({
                "step": step,
                "scroll_y": scroll_y,
                "panel": name,
                "rotation": styles.rotation(panel.container()),
                "words": words,
            });
            serde_json::to_writer(&mut out, &line)?;
            writeln!(out)?;
        }
    }

    page.unmount();
    tracing::info!(
        kills = scroller.kill_count(),
        refreshes = scroller.refresh_count(),
        "simulation finished"
    );
    Ok(())
}
