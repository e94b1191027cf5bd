use sonica::{
    ui::{app::App, router::NavigationTarget},
    util::{hook::set_panic_hook, log::initialize_logging},
};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> color_eyre::Result<()> {
    setup()?;

    let initial = parse_target(std::env::args().skip(1));
    let mut app = App::new().await?;
    app.run(initial).await
}

fn setup() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    set_panic_hook();
    initialize_logging()
}

/// Deep links mirror the web app's direct URLs: `sonica album 5` or
/// `sonica playlist 9`. No arguments lands on Home.
fn parse_target(mut args: impl Iterator<Item = String>) -> NavigationTarget {
    let kind = args.next();
    let id = args.next().and_then(|raw| raw.parse().ok());
    match (kind.as_deref(), id) {
        (Some("album"), Some(id)) => NavigationTarget::Album(id),
        (Some("playlist"), Some(id)) => NavigationTarget::Playlist(id),
        _ => NavigationTarget::Home,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<'a>(raw: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
        raw.iter().map(|s| s.to_string())
    }

    #[test]
    fn deep_link_parsing() {
        assert_eq!(parse_target(args(&[])), NavigationTarget::Home);
        assert_eq!(parse_target(args(&["album", "5"])), NavigationTarget::Album(5));
        assert_eq!(
            parse_target(args(&["playlist", "9"])),
            NavigationTarget::Playlist(9)
        );
        assert_eq!(parse_target(args(&["album", "x"])), NavigationTarget::Home);
        assert_eq!(parse_target(args(&["whatever"])), NavigationTarget::Home);
    }
}
