use std::env;
use std::sync::Arc;
use std::time::Duration;

use flume::{Receiver, Sender};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::{
    audio::{
        output::{AudioOutput, NullOutput, RodioOutput},
        player::Player,
    },
    event::events::Event,
    http::ApiService,
    storage::PlayerStore,
    ui::{
        components::{friends::FriendPanelWidget, player_bar::PlayerBarWidget},
        context::AppContext,
        router::{NavigationTarget, Router},
        state::AppState,
        tui,
        util::handler::EventHandler,
    },
    util::task::TaskManager,
};

const FRIEND_POLL_INTERVAL: Duration = Duration::from_secs(10);
const FRIEND_PANEL_WIDTH: u16 = 28;
const WIDE_LAYOUT_MIN_WIDTH: u16 = 80;

pub struct App {
    pub ctx: AppContext,
    pub router: Router,
    pub state: AppState,
    pub task_manager: TaskManager,
    pub event_rx: Receiver<Event>,
    pub event_tx: Sender<Event>,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub async fn new() -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let api = Arc::new(ApiService::new()?);

        if let (Ok(email), Ok(password)) = (env::var("SONICA_EMAIL"), env::var("SONICA_PASSWORD"))
        {
            match api.login(&email, &password).await {
                Ok(_) => info!("logged in as {email}"),
                Err(e) => warn!("login failed: {e}"),
            }
        }

        let output: Box<dyn AudioOutput> = match RodioOutput::new(api.clone()) {
            Ok(output) => Box::new(output),
            Err(e) => {
                warn!("no audio device, running silent: {e}");
                Box::new(NullOutput::new())
            }
        };
        let mut player = Player::new(output, PlayerStore::new(), event_tx.clone());
        player.restore();

        Self::spawn_friend_poller(api.clone(), event_tx.clone());

        Ok(Self {
            ctx: AppContext {
                api,
                player,
                event_tx: event_tx.clone(),
            },
            router: Router::new(),
            state: AppState::default(),
            task_manager: TaskManager::new(),
            event_rx,
            event_tx,
            has_focus: true,
            should_quit: false,
        })
    }

    pub async fn run(&mut self, initial: NavigationTarget) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        EventHandler::navigate(self, initial, true);
        while !self.should_quit {
            tui.draw(|f| {
                self.ui(f);
            })?;

            EventHandler::handle_events(self, &mut tui).await?;
        }

        self.task_manager.abort_all();
        tui.exit()?;
        Ok(())
    }

    fn ui(&mut self, frame: &mut Frame) {
        if !self.has_focus {
            return;
        }
        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(4)])
            .split(frame.area());

        let content = if rows[0].width >= WIDE_LAYOUT_MIN_WIDTH {
            let columns = Layout::horizontal([
                Constraint::Min(1),
                Constraint::Length(FRIEND_PANEL_WIDTH),
            ])
            .split(rows[0]);
            frame.render_widget(FriendPanelWidget::new(&self.state.friends), columns[1]);
            columns[0]
        } else {
            rows[0]
        };

        self.router.render(frame, content, &self.state, &self.ctx);
        frame.render_widget(
            PlayerBarWidget::new(&self.ctx.player, &self.state),
            rows[1],
        );
    }

    /// Polls friend activity on an interval. Each poll runs in its own
    /// task so a slow response never delays the next tick.
    fn spawn_friend_poller(api: Arc<ApiService>, tx: Sender<Event>) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(FRIEND_POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let api = api.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    match api.fetch_active_friends().await {
                        Ok(friends) => {
                            let _ = tx.send(Event::FriendActivity(friends));
                        }
                        Err(e) => debug!("friend activity poll failed: {e}"),
                    }
                });
            }
        });
    }
}
