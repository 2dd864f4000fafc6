//! Screen lifecycle and interaction routing through a recording host.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use lattice_inventory::content::{LiveView, PropertyValue};
use lattice_inventory::event::{BottomClickEvent, OutsideClickEvent, UpdateEvent};
use lattice_inventory::host::{DragType, HostEventBridge};
use lattice_inventory::prelude::*;
use lattice_inventory::session::{CloseOutcome, InteractionOutcome};
use parking_lot::Mutex;

// -----------------------------------------------------------------------------
// Recording host
// -----------------------------------------------------------------------------

#[derive(Default)]
struct RecordingView {
    slots: Mutex<HashMap<usize, Option<ItemStack>>>,
    titles: Mutex<Vec<String>>,
    closed: AtomicBool,
    writer_threads: Mutex<Vec<thread::ThreadId>>,
}

impl RecordingView {
    fn slot(&self, slot: usize) -> Option<ItemStack> {
        self.slots.lock().get(&slot).cloned().flatten()
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl LiveView for RecordingView {
    fn set_slot(&self, slot: usize, item: Option<ItemStack>) {
        self.writer_threads.lock().push(thread::current().id());
        self.slots.lock().insert(slot, item);
    }

    fn rename(&self, title: &str) {
        self.titles.lock().push(title.to_owned());
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
struct RecordingOpener {
    views: Arc<Mutex<Vec<(ViewerId, String, Arc<RecordingView>)>>>,
}

impl RecordingOpener {
    fn opened(&self) -> usize {
        self.views.lock().len()
    }

    fn last_view(&self) -> Arc<RecordingView> {
        self.views.lock().last().map(|(_, _, view)| view.clone()).unwrap()
    }

    fn view_of(&self, viewer: ViewerId) -> Arc<RecordingView> {
        self.views
            .lock()
            .iter()
            .rev()
            .find(|(owner, _, _)| *owner == viewer)
            .map(|(_, _, view)| view.clone())
            .unwrap()
    }
}

impl InventoryOpener for RecordingOpener {
    fn supports(&self, kind: InventoryKind) -> bool {
        kind == InventoryKind::Chest
    }

    fn open(
        &self,
        page: &Page,
        viewer: ViewerId,
        contents: &GridContent,
    ) -> lattice_inventory::Result<Arc<dyn LiveView>> {
        let view = Arc::new(RecordingView::default());
        {
            let mut slots = view.slots.lock();
            for (index, item) in contents.rendered().into_iter().enumerate() {
                slots.insert(index, item);
            }
        }
        self.views.lock().push((viewer, page.id().to_owned(), view.clone()));
        Ok(view)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn manager() -> (InventoryManager, RecordingOpener) {
    init_tracing();
    let manager = InventoryManager::new();
    let opener = RecordingOpener::default();
    manager.register_opener(opener.clone());
    (manager, opener)
}

fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

fn count(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

fn bump(counter: &Arc<AtomicUsize>) -> impl Fn() + Clone + Send + Sync + 'static {
    let counter = counter.clone();
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

fn emerald() -> ItemStack {
    ItemStack::new("minecraft:emerald")
}

const ALEX: ViewerId = ViewerId(1);
const SAM: ViewerId = ViewerId(2);

// -----------------------------------------------------------------------------
// Opening
// -----------------------------------------------------------------------------

#[test]
fn test_open_renders_grid_into_view() {
    let (manager, opener) = manager();
    let page = Arc::new(
        Page::new(PageConfig::chest("shop", "Shop", 3), |_viewer: ViewerId, contents: &mut GridContent| {
            contents.set(1, 4, Icon::new(emerald()));
        })
        .unwrap(),
    );

    let contents = manager.open(&page, ALEX).unwrap();
    assert!(contents.lock().is_live());
    assert_eq!(contents.lock().viewer(), Some(ALEX));

    let view = opener.last_view();
    assert_eq!(view.slot(13), Some(emerald()));
    assert_eq!(view.slot(0), None);

    assert!(manager.has_open(ALEX));
    assert_eq!(manager.page(ALEX).unwrap().id(), "shop");
    assert_eq!(manager.viewers_of("shop"), vec![ALEX]);

    // Writes after opening reach the view directly on the main thread.
    contents.lock().set(0, 0, Icon::new(ItemStack::new("minecraft:stone")));
    assert_eq!(view.slot(0).unwrap().material, "minecraft:stone");
    contents.lock().clear(0, 0);
    assert_eq!(view.slot(0), None);
}

#[test]
fn test_open_errors() {
    let manager = InventoryManager::new();
    let page = Arc::new(Page::new(PageConfig::chest("a", "A", 1), EmptyProvider).unwrap());
    assert!(matches!(
        manager.open(&page, ALEX),
        Err(Error::NoOpener {
            kind: InventoryKind::Chest
        })
    ));

    let hopper = Arc::new(
        Page::new(PageConfig::of_kind("h", "Hopper", InventoryKind::Hopper), EmptyProvider).unwrap(),
    );
    manager.register_opener(RecordingOpener::default());
    assert!(matches!(manager.open(&hopper, ALEX), Err(Error::NoOpener { .. })));

    let vip = Arc::new(
        Page::new(PageConfig::chest("vip", "VIP", 1), EmptyProvider)
            .unwrap()
            .with_can_open(|viewer| viewer == SAM),
    );
    assert!(matches!(manager.open(&vip, ALEX), Err(Error::OpenDenied { .. })));
    assert!(manager.open(&vip, SAM).is_ok());
    assert!(!manager.has_open(ALEX));
}

#[test]
fn test_open_at_sets_page_and_properties() {
    let (manager, _opener) = manager();
    let seen = Arc::new(Mutex::new(None));
    let record = seen.clone();
    let page = Arc::new(
        Page::new(PageConfig::chest("kits", "Kits", 2), move |_viewer: ViewerId, contents: &mut GridContent| {
            let kit = contents.property::<String>("kit").cloned();
            *record.lock() = Some((contents.pagination().page(), kit));
        })
        .unwrap(),
    );

    let kit: PropertyValue = Box::new("warrior".to_owned());
    manager.open_at(&page, ALEX, 2, [("kit".to_owned(), kit)]).unwrap();

    assert_eq!(*seen.lock(), Some((2, Some("warrior".to_owned()))));
}

#[test]
fn test_init_and_open_handlers() {
    let (manager, _opener) = manager();
    let inits = counter();
    let opens = counter();
    let on_init = bump(&inits);
    let on_open = bump(&opens);
    let page = Arc::new(
        Page::new(PageConfig::chest("a", "A", 1), EmptyProvider)
            .unwrap()
            .with_handle(Handle::of(move |_: &mut InitEvent| on_init()))
            .with_handle(Handle::of(move |_: &mut OpenEvent| on_open())),
    );

    manager.open(&page, ALEX).unwrap();
    assert_eq!(count(&inits), 1);
    assert_eq!(count(&opens), 0);

    let router = manager.router();
    assert!(router.on_open(ALEX));
    assert!(!router.on_open(SAM));
    assert_eq!(count(&opens), 1);
}

#[test]
fn test_open_replaces_previous_screen() {
    let (manager, opener) = manager();
    let closes = counter();
    let on_close = bump(&closes);
    let locked = Arc::new(
        Page::new(PageConfig::chest("locked", "Locked", 1), EmptyProvider)
            .unwrap()
            .with_can_close(|_| false)
            .with_handle(Handle::of(move |_: &mut CloseEvent| on_close())),
    );
    let other = Arc::new(Page::new(PageConfig::chest("other", "Other", 1), EmptyProvider).unwrap());

    // Chest pages tick every host tick by default.
    manager.open(&locked, ALEX).unwrap();
    assert_eq!(manager.scheduler().active_count(), 1);
    manager.open(&other, ALEX).unwrap();

    assert_eq!(count(&closes), 1);
    assert_eq!(manager.page(ALEX).unwrap().id(), "other");
    assert_eq!(manager.scheduler().active_count(), 0);
    // The host replaces the window itself.
    assert!(!opener.views.lock()[0].2.is_closed());
}

#[test]
fn test_screen_opened_during_init_is_ended() {
    let (manager, _opener) = manager();
    let closes = counter();
    let on_close = bump(&closes);
    let clock = Arc::new(
        Page::new(PageConfig::chest("clock", "Clock", 1).with_tick(1, false), EmptyProvider)
            .unwrap()
            .with_handle(Handle::of(move |_: &mut CloseEvent| on_close())),
    );
    let gate = Arc::new(
        Page::new(PageConfig::chest("gate", "Gate", 1).with_tick(1, false), EmptyProvider)
            .unwrap()
            .with_handle(Handle::of(move |event: &mut InitEvent| {
                if let Some(manager) = event.context().manager() {
                    manager.open(&clock, event.viewer()).unwrap();
                }
            })),
    );

    manager.open(&gate, ALEX).unwrap();

    assert_eq!(manager.page(ALEX).unwrap().id(), "gate");
    assert_eq!(count(&closes), 1);
    assert_eq!(manager.scheduler().active_count(), 1);

    manager.close(ALEX).unwrap();
    assert_eq!(manager.scheduler().active_count(), 0);
}

// -----------------------------------------------------------------------------
// Clicks and drags
// -----------------------------------------------------------------------------

#[test]
fn test_click_routing() {
    let (manager, _opener) = manager();
    let icon_clicks = counter();
    let outside = counter();
    let bottom = counter();
    let on_icon = bump(&icon_clicks);
    let on_outside = bump(&outside);
    let on_bottom = bump(&bottom);

    let page = Arc::new(
        Page::new(PageConfig::chest("menu", "Menu", 3), move |_viewer: ViewerId, contents: &mut GridContent| {
            let on_icon = on_icon.clone();
            contents.set(1, 4, Icon::click(emerald(), move |_| on_icon()));
        })
        .unwrap()
        .with_handle(Handle::of(move |_: &mut OutsideClickEvent| on_outside()))
        .with_handle(Handle::of(move |_: &mut BottomClickEvent| on_bottom())),
    );
    manager.open(&page, ALEX).unwrap();
    let router = manager.router();

    let outcome = router.on_click(ALEX, Some(13), ClickType::Left, InventoryAction::PickupAll);
    assert_eq!(outcome, InteractionOutcome::Cancelled);
    assert_eq!(count(&icon_clicks), 1);

    // Empty slot: nothing to run, still cancelled.
    let outcome = router.on_click(ALEX, Some(0), ClickType::Left, InventoryAction::PickupAll);
    assert!(outcome.is_cancelled());
    assert_eq!(count(&icon_clicks), 1);

    let outcome = router.on_click(ALEX, Some(40), ClickType::Left, InventoryAction::PickupAll);
    assert_eq!(outcome, InteractionOutcome::Allowed);
    let outcome = router.on_click(ALEX, Some(40), ClickType::ShiftLeft, InventoryAction::MoveToOtherInventory);
    assert_eq!(outcome, InteractionOutcome::Cancelled);
    assert_eq!(count(&bottom), 2);

    let outcome = router.on_click(ALEX, None, ClickType::Left, InventoryAction::Nothing);
    assert_eq!(outcome, InteractionOutcome::Allowed);
    assert_eq!(count(&outside), 1);

    let outcome = router.on_click(SAM, Some(13), ClickType::Left, InventoryAction::PickupAll);
    assert_eq!(outcome, InteractionOutcome::Ignored);
    assert_eq!(count(&icon_clicks), 1);
}

#[test]
fn test_page_handlers_run_before_icon_handlers() {
    let (manager, _opener) = manager();
    let order = Arc::new(Mutex::new(Vec::new()));
    let page_order = order.clone();
    let icon_order = order.clone();

    let page = Arc::new(
        Page::new(PageConfig::chest("menu", "Menu", 1), move |_viewer: ViewerId, contents: &mut GridContent| {
            let icon_order = icon_order.clone();
            contents.set(0, 2, Icon::click(emerald(), move |event| {
                icon_order.lock().push("icon");
                event.cancel();
            }));
        })
        .unwrap()
        .with_handle(Handle::of(move |event: &mut ClickEvent| {
            page_order.lock().push("page");
            event.allow();
        })),
    );
    manager.open(&page, ALEX).unwrap();
    let router = manager.router();

    let outcome = router.on_click(ALEX, Some(2), ClickType::Left, InventoryAction::PickupAll);
    assert_eq!(outcome, InteractionOutcome::Cancelled);
    assert_eq!(*order.lock(), vec!["page", "icon"]);

    // No icon on slot 5, so the page handler's decision stands.
    let outcome = router.on_click(ALEX, Some(5), ClickType::Left, InventoryAction::PickupAll);
    assert_eq!(outcome, InteractionOutcome::Allowed);
}

#[test]
fn test_guarded_icon_handles() {
    let (manager, _opener) = manager();
    let left = counter();
    let right = counter();
    let on_left = bump(&left);
    let on_right = bump(&right);

    let page = Arc::new(
        Page::new(PageConfig::chest("menu", "Menu", 1), move |_viewer: ViewerId, contents: &mut GridContent| {
            let on_left = on_left.clone();
            let on_right = on_right.clone();
            let icon = Icon::new(emerald())
                .handle(
                    Handle::of(move |_: &mut ClickEvent| on_left())
                        .when(|event: &ClickEvent| event.click_type().is_left_click()),
                )
                .handle(
                    Handle::of(move |_: &mut ClickEvent| on_right())
                        .when(|event: &ClickEvent| event.click_type().is_right_click()),
                );
            contents.set(0, 0, icon);
            contents.set(
                0,
                1,
                Icon::click(emerald(), |_| panic!("hidden icon ran")).can_see(|_| false),
            );
        })
        .unwrap(),
    );
    manager.open(&page, ALEX).unwrap();
    let router = manager.router();

    router.on_click(ALEX, Some(0), ClickType::Left, InventoryAction::PickupAll);
    router.on_click(ALEX, Some(0), ClickType::ShiftLeft, InventoryAction::MoveToOtherInventory);
    router.on_click(ALEX, Some(0), ClickType::Right, InventoryAction::PickupHalf);
    router.on_click(ALEX, Some(1), ClickType::Left, InventoryAction::PickupAll);

    assert_eq!(count(&left), 2);
    assert_eq!(count(&right), 1);
}

#[test]
fn test_editable_slots() {
    let (manager, _opener) = manager();
    let config = PageConfig::chest("bench", "Bench", 2).with_editable(SlotPos::new(0, 0));
    let page = Arc::new(Page::new(config, EmptyProvider).unwrap());
    let contents = manager.open(&page, ALEX).unwrap();
    assert!(contents.lock().is_editable(SlotPos::new(0, 0)));

    let router = manager.router();
    assert_eq!(
        router.on_click(ALEX, Some(0), ClickType::Left, InventoryAction::PlaceAll),
        InteractionOutcome::Allowed
    );
    assert_eq!(
        router.on_click(ALEX, Some(1), ClickType::Left, InventoryAction::PlaceAll),
        InteractionOutcome::Cancelled
    );

    assert_eq!(router.on_drag(ALEX, vec![0], DragType::Even), InteractionOutcome::Allowed);
    assert_eq!(router.on_drag(ALEX, vec![0, 1], DragType::Even), InteractionOutcome::Cancelled);
    assert_eq!(router.on_drag(ALEX, vec![20, 21], DragType::Single), InteractionOutcome::Allowed);
    assert_eq!(router.on_drag(SAM, vec![0], DragType::Single), InteractionOutcome::Ignored);
}

#[test]
fn test_drag_reaches_icons() {
    let (manager, _opener) = manager();
    let drags = Arc::new(Mutex::new(Vec::new()));
    let record = drags.clone();

    let page = Arc::new(
        Page::new(PageConfig::chest("menu", "Menu", 1), move |_viewer: ViewerId, contents: &mut GridContent| {
            let record = record.clone();
            contents.set(
                0,
                3,
                Icon::new(emerald()).handle(Handle::of(move |event: &mut DragEvent| {
                    record.lock().push(event.slots().to_vec());
                })),
            );
        })
        .unwrap(),
    );
    manager.open(&page, ALEX).unwrap();

    let outcome = manager.router().on_drag(ALEX, vec![3, 4, 30], DragType::Even);
    assert_eq!(outcome, InteractionOutcome::Cancelled);
    assert_eq!(*drags.lock(), vec![vec![SlotPos::new(0, 3), SlotPos::new(0, 4)]]);
}

#[test]
fn test_handler_closes_screen() {
    let (manager, opener) = manager();
    let page = Arc::new(
        Page::new(PageConfig::chest("menu", "Menu", 1), |_viewer: ViewerId, contents: &mut GridContent| {
            contents.set(0, 0, Icon::click(emerald(), |event| event.close()));
        })
        .unwrap(),
    );
    manager.open(&page, ALEX).unwrap();

    manager
        .router()
        .on_click(ALEX, Some(0), ClickType::Left, InventoryAction::PickupAll);
    assert!(!manager.has_open(ALEX));
    assert!(opener.last_view().is_closed());
}

#[test]
fn test_handler_mutates_grid() {
    let (manager, opener) = manager();
    let page = Arc::new(
        Page::new(PageConfig::chest("menu", "Menu", 1), |_viewer: ViewerId, contents: &mut GridContent| {
            contents.set(
                0,
                0,
                Icon::click(emerald(), |event| {
                    let mut contents = event.contents().lock();
                    let amount = contents.property_or("clicks", 0u32) + 1;
                    contents.set_property("clicks", amount);
                    contents.set(0, 8, Icon::new(ItemStack::new("minecraft:gold_ingot").with_amount(amount)));
                }),
            );
        })
        .unwrap(),
    );
    manager.open(&page, ALEX).unwrap();
    let router = manager.router();

    router.on_click(ALEX, Some(0), ClickType::Left, InventoryAction::PickupAll);
    router.on_click(ALEX, Some(0), ClickType::Left, InventoryAction::PickupAll);
    assert_eq!(opener.last_view().slot(8).unwrap().amount, 2);
}

// -----------------------------------------------------------------------------
// Closing
// -----------------------------------------------------------------------------

#[test]
fn test_close_runs_handlers_and_closes_view() {
    let (manager, opener) = manager();
    let closes = counter();
    let on_close = bump(&closes);
    let page = Arc::new(
        Page::new(PageConfig::chest("a", "A", 1), EmptyProvider)
            .unwrap()
            .with_handle(Handle::of(move |_: &mut CloseEvent| on_close())),
    );

    let contents = manager.open(&page, ALEX).unwrap();
    manager.close(ALEX).unwrap();

    assert_eq!(count(&closes), 1);
    assert!(opener.last_view().is_closed());
    assert!(!contents.lock().is_live());
    assert!(matches!(manager.close(ALEX), Err(Error::NotOpen { viewer: ALEX })));
}

#[test]
fn test_close_veto_reopens_on_next_tick() {
    let (manager, opener) = manager();
    let closes = counter();
    let on_close = bump(&closes);
    let page = Arc::new(
        Page::new(PageConfig::chest("locked", "Locked", 1), |_viewer: ViewerId, contents: &mut GridContent| {
            contents.set(0, 0, Icon::new(emerald()));
        })
        .unwrap()
        .with_can_close(|event| event.contents().lock().property_or("unlocked", false))
        .with_handle(Handle::of(move |_: &mut CloseEvent| on_close())),
    );
    let contents = manager.open(&page, ALEX).unwrap();
    let router = manager.router();

    assert_eq!(router.on_close(ALEX), CloseOutcome::Reopen);
    assert!(manager.has_open(ALEX));
    assert_eq!(count(&closes), 0);
    assert_eq!(opener.opened(), 1);

    router.on_tick();
    assert_eq!(opener.opened(), 2);
    assert_eq!(opener.last_view().slot(0), Some(emerald()));
    assert!(Arc::ptr_eq(&manager.contents(ALEX).unwrap(), &contents));

    // The fresh view receives later writes.
    contents.lock().set(0, 1, Icon::new(emerald()));
    assert_eq!(opener.last_view().slot(1), Some(emerald()));

    contents.lock().set_property("unlocked", true);
    assert_eq!(router.on_close(ALEX), CloseOutcome::Closed);
    assert_eq!(count(&closes), 1);
    assert!(!manager.has_open(ALEX));
    // The host already closed its view.
    assert!(!opener.last_view().is_closed());
    assert_eq!(router.on_close(ALEX), CloseOutcome::Ignored);
}

#[test]
fn test_manager_close_bypasses_veto() {
    let (manager, _opener) = manager();
    let page = Arc::new(
        Page::new(PageConfig::chest("locked", "Locked", 1), EmptyProvider)
            .unwrap()
            .with_can_close(|_| false),
    );
    manager.open(&page, ALEX).unwrap();
    manager.close(ALEX).unwrap();
    assert!(!manager.has_open(ALEX));
}

#[test]
fn test_back_opens_parent() {
    let (manager, opener) = manager();
    let main = Arc::new(Page::new(PageConfig::chest("main", "Main", 3), EmptyProvider).unwrap());
    let settings = Arc::new(
        Page::new(PageConfig::chest("settings", "Settings", 1), EmptyProvider)
            .unwrap()
            .with_parent(main.clone()),
    );

    manager.open(&settings, ALEX).unwrap();
    let parent = manager.back(ALEX).unwrap();
    assert!(parent.is_some());
    assert_eq!(manager.page(ALEX).unwrap().id(), "main");

    assert!(manager.back(ALEX).unwrap().is_none());
    assert!(!manager.has_open(ALEX));
    assert!(opener.last_view().is_closed());
    assert!(matches!(manager.back(ALEX), Err(Error::NotOpen { .. })));
}

#[test]
fn test_disconnect() {
    let (manager, opener) = manager();
    let closes = counter();
    let on_close = bump(&closes);
    let on_silent_close = bump(&closes);
    let page = Arc::new(
        Page::new(PageConfig::chest("a", "A", 1), EmptyProvider)
            .unwrap()
            .with_handle(Handle::of(move |_: &mut CloseEvent| on_close())),
    );
    let silent_config = PageConfig {
        close_on_disconnect: false,
        ..PageConfig::chest("b", "B", 1)
    };
    let silent = Arc::new(
        Page::new(silent_config, EmptyProvider)
            .unwrap()
            .with_handle(Handle::of(move |_: &mut CloseEvent| on_silent_close())),
    );

    manager.open(&page, ALEX).unwrap();
    manager.open(&silent, SAM).unwrap();
    let router = manager.router();

    router.on_disconnect(ALEX);
    router.on_disconnect(SAM);
    router.on_disconnect(SAM);

    assert_eq!(count(&closes), 1);
    assert!(manager.sessions().is_empty());
    assert!(!opener.view_of(ALEX).is_closed());
}

#[test]
fn test_shutdown_closes_everything() {
    let (manager, opener) = manager();
    let closes = counter();
    let on_close = bump(&closes);
    let page = Arc::new(
        Page::new(PageConfig::chest("a", "A", 1).with_tick(5, true), EmptyProvider)
            .unwrap()
            .with_handle(Handle::of(move |_: &mut CloseEvent| on_close())),
    );

    manager.open(&page, ALEX).unwrap();
    manager.open(&page, SAM).unwrap();
    assert_eq!(manager.scheduler().active_count(), 2);

    manager.router().on_shutdown();

    assert_eq!(count(&closes), 2);
    assert!(manager.sessions().is_empty());
    assert_eq!(manager.scheduler().active_count(), 0);
    assert!(opener.view_of(ALEX).is_closed());
    assert!(opener.view_of(SAM).is_closed());
}

// -----------------------------------------------------------------------------
// Ticks
// -----------------------------------------------------------------------------

struct Clock {
    ticks: Arc<AtomicUsize>,
    updates: Arc<AtomicUsize>,
}

impl InventoryProvider for Clock {
    fn init(&self, _viewer: ViewerId, contents: &mut GridContent) {
        contents.set(0, 0, Icon::new(ItemStack::new("minecraft:clock")));
    }

    fn tick(&self, _viewer: ViewerId, contents: &mut GridContent) {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        contents.set(0, 1, Icon::new(ItemStack::new("minecraft:clock").with_amount(tick as u32)));
    }

    fn update(&self, _viewer: ViewerId, contents: &mut GridContent) {
        self.updates.fetch_add(1, Ordering::SeqCst);
        contents.set(0, 2, Icon::new(emerald()));
    }
}

#[test]
fn test_ticks_run_until_close() {
    let (manager, opener) = manager();
    let ticks = counter();
    let last_tick = Arc::new(Mutex::new(0));
    let record = last_tick.clone();
    let page = Arc::new(
        Page::new(
            PageConfig::chest("clock", "Clock", 1).with_tick(2, false),
            Clock {
                ticks: ticks.clone(),
                updates: counter(),
            },
        )
        .unwrap()
        .with_handle(Handle::of(move |event: &mut TickEvent| {
            *record.lock() = event.tick();
        })),
    );

    manager.open(&page, ALEX).unwrap();
    let router = manager.router();
    for _ in 0..6 {
        router.on_tick();
    }
    assert_eq!(count(&ticks), 3);
    assert_eq!(*last_tick.lock(), 3);
    assert_eq!(opener.last_view().slot(1).unwrap().amount, 3);

    assert!(manager.stop_tick(ALEX));
    assert!(!manager.stop_tick(ALEX));
    router.on_tick();
    router.on_tick();
    assert_eq!(count(&ticks), 3);

    manager.close(ALEX).unwrap();
    assert!(!manager.stop_tick(ALEX));
}

#[test]
fn test_zero_tick_schedules_nothing() {
    let (manager, _opener) = manager();
    let page = Arc::new(Page::new(PageConfig::chest("a", "A", 1).with_tick(0, false), EmptyProvider).unwrap());
    manager.open(&page, ALEX).unwrap();
    assert_eq!(manager.scheduler().active_count(), 0);
    assert!(manager.sessions().get(ALEX).unwrap().tick().is_none());
}

#[test]
fn test_async_tick_marshals_view_writes() {
    let (manager, opener) = manager();
    let ticks = counter();
    let handler_thread = Arc::new(Mutex::new(None));
    let record = handler_thread.clone();
    let page = Arc::new(
        Page::new(
            PageConfig::chest("clock", "Clock", 1).with_tick(1, true),
            Clock {
                ticks: ticks.clone(),
                updates: counter(),
            },
        )
        .unwrap()
        .with_handle(Handle::of(move |_: &mut TickEvent| {
            *record.lock() = Some(thread::current().id());
        })),
    );

    manager.open(&page, ALEX).unwrap();
    let view = opener.last_view();
    let router = manager.router();
    router.on_tick();

    let deadline = Instant::now() + Duration::from_secs(5);
    while handler_thread.lock().is_none() || manager.main_queue().pending_count() == 0 {
        assert!(Instant::now() < deadline, "async tick never ran");
        thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(count(&ticks), 1);
    assert_ne!(*handler_thread.lock(), Some(thread::current().id()));
    // The worker wrote the grid, but the view waits for the main thread.
    assert_eq!(view.slot(1), None);

    router.on_tick();
    assert_eq!(view.slot(1).unwrap().material, "minecraft:clock");
    let main = thread::current().id();
    assert!(view.writer_threads.lock().iter().all(|id| *id == main));

    manager.shutdown();
}

#[test]
fn test_notify_update_refreshes_viewers() {
    let (manager, opener) = manager();
    let updates = counter();
    let update_events = counter();
    let on_update = bump(&update_events);
    let page = Arc::new(
        Page::new(
            PageConfig::chest("board", "Board", 1).with_tick(0, false),
            Clock {
                ticks: counter(),
                updates: updates.clone(),
            },
        )
        .unwrap()
        .with_handle(Handle::of(move |_: &mut UpdateEvent| on_update())),
    );
    let other = Arc::new(Page::new(PageConfig::chest("other", "Other", 1), EmptyProvider).unwrap());

    manager.open(&page, ALEX).unwrap();
    manager.open(&page, SAM).unwrap();
    manager.open(&other, ViewerId(3)).unwrap();

    manager.notify_update(&page);

    assert_eq!(count(&updates), 2);
    assert_eq!(count(&update_events), 2);
    assert_eq!(opener.view_of(ALEX).slot(2), Some(emerald()));
    assert_eq!(opener.view_of(SAM).slot(2), Some(emerald()));
    assert_eq!(opener.view_of(ViewerId(3)).slot(2), None);
}

// -----------------------------------------------------------------------------
// Host surface
// -----------------------------------------------------------------------------

#[test]
fn test_rename() {
    let (manager, opener) = manager();
    let page = Arc::new(Page::new(PageConfig::chest("a", "A", 1), EmptyProvider).unwrap());
    manager.open(&page, ALEX).unwrap();

    manager.rename(ALEX, "Page 2/5").unwrap();
    assert_eq!(*opener.last_view().titles.lock(), vec!["Page 2/5".to_owned()]);
    assert!(matches!(manager.rename(SAM, "x"), Err(Error::NotOpen { .. })));
}

#[test]
fn test_install_bridge() {
    #[derive(Default)]
    struct Bridge {
        router: Option<InteractionRouter>,
    }

    impl HostEventBridge for Bridge {
        fn install(&mut self, router: InteractionRouter) {
            self.router = Some(router);
        }
    }

    let (manager, _opener) = manager();
    let mut bridge = Bridge::default();
    manager.install(&mut bridge);

    let page = Arc::new(Page::new(PageConfig::chest("a", "A", 1), EmptyProvider).unwrap());
    manager.open(&page, ALEX).unwrap();
    let router = bridge.router.unwrap();
    assert!(router.manager().has_open(ALEX));
}

#[test]
fn test_page_from_toml() {
    let (manager, _opener) = manager();
    let config = PageConfig::from_toml_str(
        r#"
        id = "vault"
        title = "Vault"
        rows = 2
        tick = 0
        editable = [{ row = 1, column = 8 }]
        "#,
    )
    .unwrap();
    let page = Arc::new(Page::new(config, EmptyProvider).unwrap());

    let contents = manager.open(&page, ALEX).unwrap();
    assert_eq!(contents.lock().size(), 18);
    assert_eq!(
        manager
            .router()
            .on_click(ALEX, Some(17), ClickType::Left, InventoryAction::PlaceAll),
        InteractionOutcome::Allowed
    );
}
