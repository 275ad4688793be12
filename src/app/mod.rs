//! ページ実行環境
//!
//! 起動時に Content Store の読み込みを待ってから言語を適用し、アコーディオンを
//! 初期化する。その後は `PageEvent` を 1 つずつ処理する単一スレッドのループ。

/// ループが扱うイベント
mod event;
/// ダブルタップ拡大の抑止
mod touch;

use std::time::Duration;

use tokio::sync::mpsc::{
    self,
    UnboundedReceiver,
    UnboundedSender,
};

pub use event::{
    EventOutcome,
    PageEvent,
};
pub use touch::DoubleTapGuard;

use crate::accordion::{
    AccordionController,
    ScrollScheduler,
    SectionState,
};
use crate::analytics::ContactTracker;
use crate::config::SiteSettings;
use crate::content::{
    ContentStore,
    ResourceFetcher,
    load_content_store,
};
use crate::display::{
    DisplayTree,
    ElementId,
    OFFLINE_CLASS,
};
use crate::localizer::Localizer;
use crate::preference::PreferenceStore;

/// 処理中のエラーで表示するバナーの文言
pub const ERROR_BANNER_TEXT: &str = "Ocorreu um erro. Por favor, recarregue a página.";

/// ホテル案内ページ
#[derive(Debug)]
pub struct HotelApp<T, P> {
    /// 表示ツリー
    tree: T,
    /// 言語の切り替え
    localizer: Localizer<P>,
    /// セクションの開閉
    accordion: AccordionController,
    /// 展開後のスクロール
    scroll: ScrollScheduler<PageEvent>,
    /// 連絡先リンクのクリック記録
    tracker: ContactTracker,
    /// ダブルタップ拡大の抑止
    double_tap: DoubleTapGuard,
    /// エラーバナーを表示しておく時間
    banner_timeout: Duration,
    /// 遅延イベントの送信先（自分自身のループ）
    tx: UnboundedSender<PageEvent>,
}

impl<T, P> HotelApp<T, P>
where
    T: DisplayTree,
    P: PreferenceStore,
{
    /// ページを起動する
    ///
    /// Content Store の読み込み（失敗時はフォールバック）が終わるまで
    /// 表示の更新は行わない。返されたレシーバーを [`Self::run`] に渡す。
    pub async fn start<F>(
        tree: T,
        preferences: P,
        fetcher: &F,
        settings: &SiteSettings,
    ) -> (Self, UnboundedReceiver<PageEvent>)
    where
        F: ResourceFetcher + ?Sized,
    {
        let store = load_content_store(fetcher, &settings.content_path).await;
        Self::new(tree, store, preferences, settings)
    }

    /// 読み込み済みの Content Store からページを組み立てる
    ///
    /// デフォルト言語を適用してからアコーディオンを初期化する。
    pub fn new(
        mut tree: T,
        store: ContentStore,
        preferences: P,
        settings: &SiteSettings,
    ) -> (Self, UnboundedReceiver<PageEvent>) {
        let mut localizer = Localizer::new(store, preferences)
            .with_default_language(&settings.default_language)
            .with_preference_key(&settings.preference_key);
        let default_language = localizer.default_language().to_string();
        localizer.apply_language(&mut tree, &default_language);

        let mut accordion = AccordionController::new(settings.default_expanded.iter().cloned());
        accordion.initialize(&mut tree);

        let (tx, rx) = mpsc::unbounded_channel();
        let scroll =
            ScrollScheduler::new(tx.clone(), PageEvent::ScrollDue, settings.scroll_delay())
                .with_reduced_motion(settings.reduced_motion);

        tracing::debug!(language = localizer.current_language(), "Page started");

        let app = Self {
            tree,
            localizer,
            accordion,
            scroll,
            tracker: ContactTracker::new(),
            double_tap: DoubleTapGuard::new(settings.double_tap_window()),
            banner_timeout: settings.banner_timeout(),
            tx,
        };
        (app, rx)
    }

    /// イベントループ
    ///
    /// `PageEvent::Unload` を受け取るまで 1 件ずつ処理する。
    pub async fn run(&mut self, rx: &mut UnboundedReceiver<PageEvent>) {
        while let Some(event) = rx.recv().await {
            if self.handle(event) == EventOutcome::Stop {
                break;
            }
        }
        self.scroll.cancel();
        tracing::debug!("Page loop stopped");
    }

    /// ループにイベントを送るためのハンドル
    #[must_use]
    pub fn sender(&self) -> UnboundedSender<PageEvent> {
        self.tx.clone()
    }

    /// イベントを 1 件処理する
    pub fn handle(&mut self, event: PageEvent) -> EventOutcome {
        match event {
            PageEvent::LanguageSelected(code) => {
                self.localizer.apply_language(&mut self.tree, &code);
            }
            PageEvent::HeaderClicked(section) => self.toggle_section(&section),
            PageEvent::LinkClicked(href) => {
                self.tracker.link_clicked(&href, self.localizer.current_language());
            }
            PageEvent::Online => {
                tracing::info!("App is online");
                let body = self.tree.body();
                self.tree.remove_class(body, OFFLINE_CLASS);
            }
            PageEvent::Offline => {
                tracing::info!("App is offline");
                let body = self.tree.body();
                self.tree.add_class(body, OFFLINE_CLASS);
            }
            PageEvent::VisibilityChanged { visible } => {
                if visible {
                    tracing::debug!("Page became visible");
                }
            }
            PageEvent::TouchEnd { at_ms } => {
                if self.double_tap.touch_end(at_ms) {
                    return EventOutcome::PreventDefault;
                }
            }
            PageEvent::Fault { context, message } => {
                self.report_error(&context, &message);
            }
            PageEvent::ScrollDue(section) => self.scroll_to(&section),
            PageEvent::DismissBanner(banner) => self.tree.remove(banner),
            PageEvent::Unload => return EventOutcome::Stop,
        }
        EventOutcome::Handled
    }

    /// エラーをログに残し、一時的なバナーを表示する
    ///
    /// バナーは `banner_timeout` 後に消える。以降の操作は妨げない。
    pub fn report_error(&mut self, context: &str, message: &str) -> ElementId {
        tracing::error!("Error in {context}: {message}");

        let banner = self.tree.show_banner(ERROR_BANNER_TEXT);
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let tx = self.tx.clone();
            let timeout = self.banner_timeout;
            runtime.spawn(async move {
                tokio::time::sleep(timeout).await;
                let _ = tx.send(PageEvent::DismissBanner(banner));
            });
        }
        banner
    }

    /// セクションを開閉し、開いた場合はスクロールを予約する
    fn toggle_section(&mut self, section: &str) {
        match self.accordion.toggle(&mut self.tree, section) {
            Some(SectionState::Expanded) => {
                self.scroll.schedule(section);
            }
            Some(SectionState::Collapsed) => self.scroll.cancel(),
            None => tracing::debug!(section, "Unknown accordion section"),
        }
    }

    /// 遅延スクロールの実行（その間に閉じられていたら何もしない）
    fn scroll_to(&mut self, section: &str) {
        if self.accordion.state(section) != Some(SectionState::Expanded) {
            return;
        }
        if let Some(header) = self.accordion.header(section) {
            self.tree.scroll_into_view(header);
        }
    }

    #[must_use]
    pub const fn tree(&self) -> &T {
        &self.tree
    }

    #[must_use]
    pub const fn localizer(&self) -> &Localizer<P> {
        &self.localizer
    }

    #[must_use]
    pub const fn accordion(&self) -> &AccordionController {
        &self.accordion
    }

    #[must_use]
    pub const fn tracker(&self) -> &ContactTracker {
        &self.tracker
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::content::CONTENT_PATH;
    use crate::display::{
        ACTIVE_CLASS,
        MemoryTree,
        Role,
        SectionElements,
    };
    use crate::preference::MemoryPreferences;
    use crate::test_utils::StaticFetcher;

    const CONTENT: &str = r#"{
        "pt": {"hotel_name": "Hotel Maerkli", "welcome": "Seja muito bem-vindo!"},
        "en": {"hotel_name": "Hotel Maerkli", "welcome": "Welcome!"}
    }"#;

    struct Harness {
        app: HotelApp<MemoryTree, MemoryPreferences>,
        rx: UnboundedReceiver<PageEvent>,
        breakfast: SectionElements,
    }

    async fn start(settings: SiteSettings) -> Harness {
        let mut tree = MemoryTree::new();
        tree.add_language_button("pt");
        tree.add_language_button("en");
        tree.add_binding("h1", "hotel_name");
        tree.add_binding("p", "welcome");
        tree.add_section("checkin");
        let breakfast = tree.add_section("breakfast");
        let fetcher = StaticFetcher::new().with(CONTENT_PATH, CONTENT);

        let (app, rx) =
            HotelApp::start(tree, MemoryPreferences::new(), &fetcher, &settings).await;
        Harness { app, rx, breakfast }
    }

    fn fast_settings() -> SiteSettings {
        SiteSettings { scroll_delay_ms: 1, banner_timeout_ms: 1, ..SiteSettings::default() }
    }

    fn welcome(app: &HotelApp<MemoryTree, MemoryPreferences>) -> String {
        let tree = app.tree();
        tree.text_content(tree.element_for_key("welcome").unwrap())
    }

    #[tokio::test]
    async fn start_renders_default_language_and_sections() {
        let harness = start(SiteSettings::default()).await;
        let app = &harness.app;

        assert_eq!(app.localizer().current_language(), "pt");
        assert_eq!(welcome(app), "Seja muito bem-vindo!");
        assert_eq!(app.tree().document_language(), "pt-BR");
        assert_eq!(app.accordion().state("checkin"), Some(SectionState::Expanded));
        assert_eq!(app.accordion().state("breakfast"), Some(SectionState::Collapsed));
    }

    #[tokio::test]
    async fn start_with_unreachable_content_uses_fallback() {
        let tree = MemoryTree::new();
        let (app, _rx) = HotelApp::start(
            tree,
            MemoryPreferences::new(),
            &StaticFetcher::new(),
            &SiteSettings::default(),
        )
        .await;

        assert!(app.localizer().current_content().contains_key("hotel_name"));
        assert!(app.localizer().current_content().contains_key("welcome"));
    }

    #[tokio::test]
    async fn unsupported_configured_default_starts_in_portuguese() {
        let settings =
            SiteSettings { default_language: "de".to_string(), ..SiteSettings::default() };
        let mut tree = MemoryTree::new();
        tree.add_language_button("pt");
        tree.add_binding("p", "welcome");

        let (mut app, _rx) =
            HotelApp::start(tree, MemoryPreferences::new(), &StaticFetcher::new(), &settings).await;
        app.handle(PageEvent::LanguageSelected("fr".to_string()));

        assert_eq!(app.localizer().current_language(), "pt");
        assert!(!welcome(&app).is_empty());
        let button = app.tree().find_by_role(Role::LanguageSelector)[0];
        assert!(app.tree().has_class(button, ACTIVE_CLASS));
    }

    #[tokio::test]
    async fn language_selection_switches_and_marks_button() {
        let mut harness = start(SiteSettings::default()).await;

        harness.app.handle(PageEvent::LanguageSelected("en".to_string()));

        assert_eq!(welcome(&harness.app), "Welcome!");
        let tree = harness.app.tree();
        let active: Vec<_> = tree
            .find_by_role(Role::LanguageSelector)
            .into_iter()
            .filter(|button| tree.has_class(*button, ACTIVE_CLASS))
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(tree.data(active[0], "lang").as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn unsupported_language_selection_ends_in_default() {
        let mut harness = start(SiteSettings::default()).await;
        harness.app.handle(PageEvent::LanguageSelected("en".to_string()));

        harness.app.handle(PageEvent::LanguageSelected("fr".to_string()));

        assert_eq!(harness.app.localizer().current_language(), "pt");
        assert_eq!(welcome(&harness.app), "Seja muito bem-vindo!");
    }

    #[tokio::test]
    async fn expanding_section_scrolls_header_into_view() {
        let mut harness = start(fast_settings()).await;

        harness.app.handle(PageEvent::HeaderClicked("breakfast".to_string()));
        let due = tokio::time::timeout(Duration::from_secs(1), harness.rx.recv()).await.unwrap();
        harness.app.handle(due.unwrap());

        assert_eq!(harness.app.tree().scrolled(), [harness.breakfast.header]);
    }

    #[tokio::test]
    async fn scroll_is_skipped_when_section_closed_again() {
        let mut harness = start(SiteSettings::default()).await;

        harness.app.handle(PageEvent::HeaderClicked("breakfast".to_string()));
        harness.app.handle(PageEvent::HeaderClicked("breakfast".to_string()));
        harness.app.handle(PageEvent::ScrollDue("breakfast".to_string()));

        assert!(harness.app.tree().scrolled().is_empty());
        assert_eq!(harness.app.accordion().state("breakfast"), Some(SectionState::Collapsed));
    }

    #[tokio::test]
    async fn link_clicks_are_tracked_with_current_language() {
        let mut harness = start(SiteSettings::default()).await;
        harness.app.handle(PageEvent::LanguageSelected("en".to_string()));

        harness.app.handle(PageEvent::LinkClicked("tel:+554733671234".to_string()));
        harness.app.handle(PageEvent::LinkClicked("https://example.org".to_string()));

        let history = harness.app.tracker().history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, "phone_click");
        assert_eq!(history[0].label, "en");
    }

    #[tokio::test]
    async fn connectivity_toggles_offline_class() {
        let mut harness = start(SiteSettings::default()).await;
        let body = harness.app.tree().body();

        harness.app.handle(PageEvent::Offline);
        assert!(harness.app.tree().has_class(body, OFFLINE_CLASS));

        harness.app.handle(PageEvent::Online);
        assert!(!harness.app.tree().has_class(body, OFFLINE_CLASS));
    }

    #[tokio::test]
    async fn double_tap_prevents_default() {
        let mut harness = start(SiteSettings::default()).await;

        let first = harness.app.handle(PageEvent::TouchEnd { at_ms: 1_000_000 });
        let second = harness.app.handle(PageEvent::TouchEnd { at_ms: 1_000_150 });

        assert_eq!(first, EventOutcome::Handled);
        assert_eq!(second, EventOutcome::PreventDefault);
    }

    #[tokio::test]
    async fn fault_banner_is_dismissed_and_page_stays_usable() {
        let mut harness = start(fast_settings()).await;

        harness.app.handle(PageEvent::Fault {
            context: "toggleAccordion".to_string(),
            message: "boom".to_string(),
        });
        let body_text = harness.app.tree().text_content(harness.app.tree().body());
        assert!(body_text.contains(ERROR_BANNER_TEXT));

        let dismiss =
            tokio::time::timeout(Duration::from_secs(1), harness.rx.recv()).await.unwrap();
        harness.app.handle(dismiss.unwrap());
        let body_text = harness.app.tree().text_content(harness.app.tree().body());
        assert!(!body_text.contains(ERROR_BANNER_TEXT));

        harness.app.handle(PageEvent::HeaderClicked("checkin".to_string()));
        assert_eq!(harness.app.accordion().state("checkin"), Some(SectionState::Collapsed));
    }

    #[tokio::test]
    async fn run_processes_events_until_unload() {
        let mut harness = start(SiteSettings::default()).await;
        let sender = harness.app.sender();
        sender.send(PageEvent::LanguageSelected("en".to_string())).unwrap();
        sender.send(PageEvent::HeaderClicked("wifi".to_string())).unwrap();
        sender.send(PageEvent::Unload).unwrap();

        harness.app.run(&mut harness.rx).await;

        assert_eq!(harness.app.localizer().current_language(), "en");
        assert_eq!(
            harness.app.localizer().preferences().get("hotelMaerkliLang").unwrap().as_deref(),
            Some("en")
        );
    }
}
