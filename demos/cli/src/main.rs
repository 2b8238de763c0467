use anyhow::Context;
use clap::Parser;
use sidenav_core::{
    build_menu, describe_location, render_sidebar, NavState, PersistedUiState,
    DEFAULT_REPO_FOLDER,
};

#[derive(Parser, Debug)]
#[command(
    name = "sidenav-cli",
    about = "Giải quyết đường dẫn thanh điều hướng cho một trang, in JSON hoặc markup."
)]
struct Args {
    /// Pathname của trang, ví dụ `/team/admin/sql/`.
    #[arg(short, long)]
    path: String,

    /// Tên thư mục repo trong webroot.
    #[arg(short, long, default_value = DEFAULT_REPO_FOLDER)]
    repo: String,

    /// In markup sidebar thay cho báo cáo JSON.
    #[arg(long)]
    markup: bool,

    #[arg(long)]
    collapsed: bool,

    #[arg(long)]
    locked: bool,

    #[arg(long)]
    mobile: bool,
}

impl Args {
    fn state(&self) -> NavState {
        NavState::new(
            PersistedUiState {
                is_collapsed: self.collapsed,
                is_locked: self.locked,
            },
            self.mobile,
        )
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    let repo = args.repo.trim().trim_matches('/');
    anyhow::ensure!(!repo.is_empty(), "Tên thư mục repo không được rỗng");

    let report = describe_location(&args.path, repo);
    if !args.markup {
        return serde_json::to_string_pretty(&report)
            .with_context(|| format!("Không serialize được báo cáo cho {}", args.path));
    }

    let menu = build_menu(&report.paths, report.options.current_page);
    Ok(render_sidebar(
        &menu,
        &report.paths,
        &report.options,
        &args.state(),
    ))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let output = run(&args)?;
    println!("{output}");
    Ok(())
}
