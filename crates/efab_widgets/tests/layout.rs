//! End-to-end behavior of the ExpandableFabLayout

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use efab_widgets::prelude::*;

const FRAME_MS: f32 = 16.0;

fn frame_layout() -> ExpandableFabLayout<HeadlessHost> {
    ExpandableFabLayout::with_config(
        HeadlessHost::new(),
        LayoutConfig::new().driver_clock(DriverClock::Frame),
    )
}

/// Tick until every animation and icon rotation has finished
fn settle(layout: &mut ExpandableFabLayout<HeadlessHost>) {
    for _ in 0..500 {
        layout.tick(FRAME_MS);
        if !layout.is_animating() {
            return;
        }
    }
    panic!("layout never settled");
}

struct Widget {
    overlay: ViewId,
    main: ViewId,
    options: Vec<ViewId>,
}

fn portrait_widget(layout: &mut ExpandableFabLayout<HeadlessHost>, options: usize) -> Widget {
    let overlay = Overlay::new(layout.host_mut(), Orientation::Portrait, OverlayConfig::new())
        .unwrap();
    let fab = ExpandableFab::new(
        layout.host_mut(),
        Orientation::Portrait,
        ExpandableFabConfig::new().fab_option_position(FabOptionPosition::Above),
    )
    .unwrap();

    let overlay = layout.add_view(overlay).unwrap();
    let main = layout.add_view(fab).unwrap();

    let mut ids = Vec::new();
    for i in 0..options {
        let option = FabOption::new(
            layout.host_mut(),
            Orientation::Portrait,
            FabOptionConfig::new().label_text(format!("Option {i}")),
        )
        .unwrap();
        ids.push(layout.add_view(option).unwrap());
    }

    Widget {
        overlay,
        main,
        options: ids,
    }
}

fn anchor_of(layout: &ExpandableFabLayout<HeadlessHost>, view: ViewId) -> Option<ViewId> {
    layout.host().anchor(view).map(|a| a.view)
}

fn record_phases(layout: &mut ExpandableFabLayout<HeadlessHost>) -> Rc<RefCell<Vec<WidgetPhase>>> {
    let phases = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&phases);
    layout.on_state_changed(move |phase| sink.borrow_mut().push(phase));
    phases
}

#[test]
fn test_open_and_close_end_to_end() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 3);

    layout.click(widget.main).unwrap();
    assert_eq!(layout.state(), WidgetPhase::Opening);
    settle(&mut layout);

    assert!(layout.is_open());
    assert_eq!(layout.state(), WidgetPhase::Open);
    let host = layout.host();
    for option in &widget.options {
        let node = host.node(*option).unwrap();
        assert_eq!(node.visibility, Visibility::Visible);
        assert_eq!(node.alpha, 1.0);
        assert_eq!(node.size, FabSize::Mini);
    }
    assert_eq!(host.node(widget.options[0]).unwrap().translation_y, -80.0);
    assert_eq!(host.node(widget.options[2]).unwrap().translation_y, -75.0);
    assert_eq!(host.visibility(widget.overlay), Visibility::Visible);
    assert!((host.icon_rotation(widget.main) + 135.0).abs() < 1e-3);

    // main -> opt0 -> opt1 -> opt2
    assert_eq!(anchor_of(&layout, widget.options[0]), Some(widget.main));
    assert_eq!(anchor_of(&layout, widget.options[1]), Some(widget.options[0]));
    assert_eq!(anchor_of(&layout, widget.options[2]), Some(widget.options[1]));

    layout.close();
    assert_eq!(layout.state(), WidgetPhase::Closing);
    settle(&mut layout);

    assert!(!layout.is_open());
    assert_eq!(layout.state(), WidgetPhase::Closed);
    let host = layout.host();
    for option in &widget.options {
        assert_eq!(host.visibility(*option), Visibility::Gone);
    }
    assert_eq!(host.visibility(widget.overlay), Visibility::Gone);
    assert_eq!(host.icon_rotation(widget.main), 0.0);
}

#[test]
fn test_commit_waits_for_both_signals() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 0);

    // Overlay fade (300ms) outlasts the icon rotation (250ms)
    layout.click(widget.main).unwrap();
    for _ in 0..17 {
        layout.tick(FRAME_MS);
    }
    let state = layout.state_machine();
    assert!(state.efab_animations_finished());
    assert!(!state.group_animations_finished());
    assert!(!layout.is_open());

    settle(&mut layout);
    assert!(layout.is_open());
}

#[test]
fn test_overlay_duration_override() {
    let mut layout = ExpandableFabLayout::with_config(
        HeadlessHost::new(),
        LayoutConfig::new()
            .driver_clock(DriverClock::Frame)
            .overlay_durations_ms(Some(1000), None),
    );
    let widget = portrait_widget(&mut layout, 0);

    layout.click(widget.main).unwrap();
    for _ in 0..40 {
        layout.tick(FRAME_MS);
    }
    // Rotation is long done, the overlay is still fading in
    assert!(!layout.is_open());
    settle(&mut layout);
    assert!(layout.is_open());
}

#[test]
fn test_option_click_debounced_within_cycle() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 3);
    let phases = record_phases(&mut layout);

    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let counter = Rc::clone(&first);
    layout
        .set_fab_option_on_click(
            widget.options[0],
            Some(Rc::new(move || counter.set(counter.get() + 1))),
        )
        .unwrap();
    let counter = Rc::clone(&second);
    layout
        .set_fab_option_on_click(
            widget.options[1],
            Some(Rc::new(move || counter.set(counter.get() + 1))),
        )
        .unwrap();

    layout.click(widget.main).unwrap();
    settle(&mut layout);

    layout.click(widget.options[0]).unwrap();
    layout.click(widget.options[1]).unwrap();
    assert_eq!(first.get(), 1);
    assert_eq!(second.get(), 0);
    assert!(layout.state_machine().fab_option_already_clicked());

    settle(&mut layout);
    assert!(!layout.is_open());
    let closings = phases
        .borrow()
        .iter()
        .filter(|p| **p == WidgetPhase::Closing)
        .count();
    assert_eq!(closings, 1);

    // A new cycle honors clicks again
    assert!(!layout.state_machine().fab_option_already_clicked());
    layout.click(widget.main).unwrap();
    settle(&mut layout);
    layout.click(widget.options[1]).unwrap();
    assert_eq!(second.get(), 1);
}

#[test]
fn test_hidden_option_ignores_clicks() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 2);

    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    layout
        .set_fab_option_on_click(
            widget.options[0],
            Some(Rc::new(move || counter.set(counter.get() + 1))),
        )
        .unwrap();

    assert_eq!(layout.host().visibility(widget.options[0]), Visibility::Gone);
    layout.click(widget.options[0]).unwrap();
    assert_eq!(fired.get(), 0);
    assert!(!layout.state_machine().fab_option_already_clicked());

    layout.click(widget.main).unwrap();
    settle(&mut layout);
    assert!(layout.is_open());

    layout.click(widget.options[0]).unwrap();
    assert_eq!(fired.get(), 1);
    settle(&mut layout);
    assert!(!layout.is_open());
}

#[test]
fn test_overlay_click_closes() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 1);
    let clicked = Rc::new(Cell::new(false));
    let flag = Rc::clone(&clicked);
    layout
        .set_overlay_on_click(Orientation::Portrait, Some(Rc::new(move || flag.set(true))))
        .unwrap();

    layout.click(widget.main).unwrap();
    settle(&mut layout);
    layout.click(widget.overlay).unwrap();

    assert!(clicked.get());
    assert_eq!(layout.state(), WidgetPhase::Closing);
    settle(&mut layout);
    assert!(!layout.is_open());
}

#[test]
fn test_close_during_opening_is_deferred() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 2);
    let phases = record_phases(&mut layout);

    layout.click(widget.main).unwrap();
    layout.tick(FRAME_MS);
    layout.click(widget.main).unwrap();

    assert!(layout.state_machine().close_when_able());
    assert_eq!(layout.state(), WidgetPhase::Opening);

    settle(&mut layout);
    assert!(!layout.is_open());
    assert_eq!(
        *phases.borrow(),
        vec![
            WidgetPhase::Opening,
            WidgetPhase::Open,
            WidgetPhase::Closing,
            WidgetPhase::Closed,
        ]
    );
    assert!(!layout.state_machine().close_when_able());
}

#[test]
fn test_open_twice_starts_one_group() {
    let mut layout = frame_layout();
    portrait_widget(&mut layout, 2);
    let phases = record_phases(&mut layout);

    assert!(layout.open());
    assert!(!layout.open());
    assert_eq!(*phases.borrow(), vec![WidgetPhase::Opening]);

    settle(&mut layout);
    assert!(layout.is_open());
    assert!(!layout.open());
}

#[test]
fn test_close_while_closed_is_noop() {
    let mut layout = frame_layout();
    portrait_widget(&mut layout, 1);
    let phases = record_phases(&mut layout);
    let before = layout.state_machine();

    layout.close();
    assert_eq!(layout.state_machine(), before);
    assert!(!layout.is_animating());
    assert!(phases.borrow().is_empty());
}

#[test]
fn test_negative_margin_keeps_previous_value() {
    let mut layout = frame_layout();
    portrait_widget(&mut layout, 1);

    let err = layout
        .update_expandable_fab_config(Orientation::Portrait, |config| {
            config.first_fab_option_margin_px = -1.0;
        })
        .unwrap_err();
    assert!(matches!(err, EfabError::IllegalArgument { .. }));

    let fab = layout.portrait_configuration().expandable_fab().unwrap();
    assert_eq!(fab.config().first_fab_option_margin_px, 80.0);
}

#[test]
fn test_changing_option_position_reanchors() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 2);

    layout
        .update_expandable_fab_config(Orientation::Portrait, |config| {
            config.fab_option_position = FabOptionPosition::Below;
        })
        .unwrap();

    let anchor = layout.host().anchor(widget.options[1]).unwrap();
    assert_eq!(anchor.gravity, Gravity::BOTTOM | Gravity::CENTER_HORIZONTAL);
}

#[test]
fn test_active_configuration_falls_back() {
    let mut layout = frame_layout();
    let fab = ExpandableFab::new(
        layout.host_mut(),
        Orientation::Landscape,
        ExpandableFabConfig::new(),
    )
    .unwrap();
    let main = layout.add_view(fab).unwrap();

    // Portrait device, landscape-only widget
    assert_eq!(layout.active_orientation(), Orientation::Landscape);
    assert_eq!(
        layout
            .active_configuration()
            .expandable_fab()
            .map(|f| f.view_id()),
        Some(main)
    );
    assert_eq!(layout.host().visibility(main), Visibility::Visible);

    let portrait = ExpandableFab::new(
        layout.host_mut(),
        Orientation::Portrait,
        ExpandableFabConfig::new(),
    )
    .unwrap();
    layout.add_view(portrait).unwrap();
    assert_eq!(layout.active_orientation(), Orientation::Portrait);
    assert_eq!(layout.host().visibility(main), Visibility::Gone);
}

#[test]
fn test_options_follow_their_own_orientation() {
    let mut layout = frame_layout();
    portrait_widget(&mut layout, 1);
    let landscape_option = FabOption::new(
        layout.host_mut(),
        Orientation::Landscape,
        FabOptionConfig::new(),
    )
    .unwrap();
    layout.add_view(landscape_option).unwrap();

    assert_eq!(layout.portrait_configuration().fab_options().len(), 1);
    assert_eq!(layout.landscape_configuration().fab_options().len(), 1);
}

#[test]
fn test_removing_options_keeps_chain() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 3);

    let removed = layout
        .remove_fab_option_at(Orientation::Portrait, 0)
        .unwrap();
    assert_eq!(removed.view_id(), widget.options[0]);
    assert!(!layout.host().is_attached(widget.options[0]));
    assert!(!layout.host().is_attached(removed.label().view_id()));
    assert_eq!(anchor_of(&layout, widget.options[1]), Some(widget.main));

    layout.remove_fab_option(widget.options[2]).unwrap();
    assert_eq!(anchor_of(&layout, widget.options[1]), Some(widget.main));
    assert_eq!(
        layout.remove_fab_option(widget.options[2]).unwrap_err(),
        EfabError::UnknownView(widget.options[2])
    );
}

#[test]
fn test_remove_all_views_resets() {
    let mut layout = frame_layout();
    let widget = portrait_widget(&mut layout, 3);

    layout.click(widget.main).unwrap();
    settle(&mut layout);
    layout.click(widget.options[0]).unwrap();
    layout.tick(FRAME_MS);

    layout.remove_all_views();

    assert!(!layout.is_open());
    assert!(!layout.is_animating());
    assert_eq!(layout.state_machine(), WidgetStateMachine::new());
    for configuration in [layout.portrait_configuration(), layout.landscape_configuration()] {
        assert!(configuration.overlay().is_none());
        assert!(configuration.expandable_fab().is_none());
        assert!(configuration.fab_options().is_empty());
    }
    assert!(layout.host().children().is_empty());

    // The layout is usable again afterwards
    let widget = portrait_widget(&mut layout, 1);
    layout.click(widget.main).unwrap();
    settle(&mut layout);
    assert!(layout.is_open());
}

#[test]
fn test_component_click_before_layout_is_configuration_error() {
    let mut host = HeadlessHost::new();
    let fab = ExpandableFab::new(&mut host, Orientation::Portrait, ExpandableFabConfig::new())
        .unwrap();
    assert!(matches!(fab.click(), Err(EfabError::Configuration(_))));
}

#[test]
fn test_background_clock_opens() {
    let mut layout = ExpandableFabLayout::new(HeadlessHost::new());
    let fab = ExpandableFab::new(
        layout.host_mut(),
        Orientation::Portrait,
        ExpandableFabConfig::new().durations_ms(50, 50),
    )
    .unwrap();
    let main = layout.add_view(fab).unwrap();

    layout.click(main).unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while !layout.is_open() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
        layout.tick(5.0);
    }

    assert!(layout.is_open());
    assert!((layout.host().icon_rotation(main) + 135.0).abs() < 1e-3);
}

#[test]
fn test_configs_load_from_toml() {
    let config: ExpandableFabConfig = toml::from_str(
        r#"
        fab_option_position = "below"
        first_fab_option_margin_px = 96.0
        closing_anticipate_tension = 0.0

        [label]
        text = "Menu"
        position = "right"
        "#,
    )
    .unwrap();

    assert_eq!(config.fab_option_position, FabOptionPosition::Below);
    assert_eq!(config.first_fab_option_margin_px, 96.0);
    assert_eq!(config.successive_fab_option_margin_px, 75.0);
    assert_eq!(config.label.text.as_deref(), Some("Menu"));
    assert_eq!(config.label.position, LabelPosition::Right);
    assert_eq!(config.closing_plan().phases().len(), 1);
}
