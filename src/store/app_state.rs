use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

/// A place on Earth the sky is rendered for.
#[derive(serde::Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub short_name: String,
    pub country: String,
    pub street_address: String,
    pub lat: f64,
    pub lng: f64,
    pub alt: f64,
    pub accuracy: f64,
}

impl LocationRecord {
    /// Default positioning accuracy in meters before anything was detected.
    pub const UNKNOWN_ACCURACY: f64 = 5000.0;

    pub fn new(short_name: &str, country: &str, lat: f64, lng: f64) -> Self {
        Self {
            short_name: short_name.to_string(),
            country: country.to_string(),
            lat,
            lng,
            ..Self::default()
        }
    }
}

impl Default for LocationRecord {
    fn default() -> Self {
        Self {
            short_name: String::from("Unknown"),
            country: String::from("Unknown"),
            street_address: String::new(),
            lat: 0.0,
            lng: 0.0,
            alt: 0.0,
            accuracy: Self::UNKNOWN_ACCURACY,
        }
    }
}

/// Independent boolean flags driving UI panel visibility.
///
/// The core does not interpret them; they are only addressable through
/// [`UiFlag`] so UI toggles can reach each one generically.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct UiFlags {
    pub init_complete: bool,
    pub show_navigation_drawer: bool,
    pub show_data_credits_dialog: bool,
    pub show_view_settings_dialog: bool,
    pub show_planets_visibility_dialog: bool,
    pub show_location_dialog: bool,
    pub show_side_panel: bool,
    pub show_main_tool_bar: bool,
    pub show_location_button: bool,
    pub show_time_buttons: bool,
    pub show_observing_panel_tabs_buttons: bool,
    pub show_selected_info_buttons: bool,
    #[serde(rename = "showFPS")]
    pub show_fps: bool,
    #[serde(rename = "showEquatorialJ2000GridButton")]
    pub show_equatorial_j2000_grid_button: bool,
    pub fullscreen: bool,
    pub nightmode: bool,
    pub wasm_support: bool,
}

impl Default for UiFlags {
    fn default() -> Self {
        Self {
            init_complete: false,
            show_navigation_drawer: false,
            show_data_credits_dialog: false,
            show_view_settings_dialog: false,
            show_planets_visibility_dialog: false,
            show_location_dialog: false,
            show_side_panel: false,
            show_main_tool_bar: true,
            show_location_button: true,
            show_time_buttons: true,
            show_observing_panel_tabs_buttons: true,
            show_selected_info_buttons: true,
            show_fps: false,
            show_equatorial_j2000_grid_button: false,
            fullscreen: false,
            nightmode: false,
            wasm_support: true,
        }
    }
}

/// Names every field of [`UiFlags`], spelled the way UI code addresses them.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum UiFlag {
    InitComplete,
    ShowNavigationDrawer,
    ShowDataCreditsDialog,
    ShowViewSettingsDialog,
    ShowPlanetsVisibilityDialog,
    ShowLocationDialog,
    ShowSidePanel,
    ShowMainToolBar,
    ShowLocationButton,
    ShowTimeButtons,
    ShowObservingPanelTabsButtons,
    ShowSelectedInfoButtons,
    #[strum(serialize = "showFPS")]
    ShowFps,
    #[strum(serialize = "showEquatorialJ2000GridButton")]
    ShowEquatorialJ2000GridButton,
    Fullscreen,
    Nightmode,
    WasmSupport,
}

impl UiFlag {
    pub fn get(self, flags: &UiFlags) -> bool {
        match self {
            UiFlag::InitComplete => flags.init_complete,
            UiFlag::ShowNavigationDrawer => flags.show_navigation_drawer,
            UiFlag::ShowDataCreditsDialog => flags.show_data_credits_dialog,
            UiFlag::ShowViewSettingsDialog => flags.show_view_settings_dialog,
            UiFlag::ShowPlanetsVisibilityDialog => flags.show_planets_visibility_dialog,
            UiFlag::ShowLocationDialog => flags.show_location_dialog,
            UiFlag::ShowSidePanel => flags.show_side_panel,
            UiFlag::ShowMainToolBar => flags.show_main_tool_bar,
            UiFlag::ShowLocationButton => flags.show_location_button,
            UiFlag::ShowTimeButtons => flags.show_time_buttons,
            UiFlag::ShowObservingPanelTabsButtons => flags.show_observing_panel_tabs_buttons,
            UiFlag::ShowSelectedInfoButtons => flags.show_selected_info_buttons,
            UiFlag::ShowFps => flags.show_fps,
            UiFlag::ShowEquatorialJ2000GridButton => flags.show_equatorial_j2000_grid_button,
            UiFlag::Fullscreen => flags.fullscreen,
            UiFlag::Nightmode => flags.nightmode,
            UiFlag::WasmSupport => flags.wasm_support,
        }
    }

    pub fn get_mut(self, flags: &mut UiFlags) -> &mut bool {
        match self {
            UiFlag::InitComplete => &mut flags.init_complete,
            UiFlag::ShowNavigationDrawer => &mut flags.show_navigation_drawer,
            UiFlag::ShowDataCreditsDialog => &mut flags.show_data_credits_dialog,
            UiFlag::ShowViewSettingsDialog => &mut flags.show_view_settings_dialog,
            UiFlag::ShowPlanetsVisibilityDialog => &mut flags.show_planets_visibility_dialog,
            UiFlag::ShowLocationDialog => &mut flags.show_location_dialog,
            UiFlag::ShowSidePanel => &mut flags.show_side_panel,
            UiFlag::ShowMainToolBar => &mut flags.show_main_tool_bar,
            UiFlag::ShowLocationButton => &mut flags.show_location_button,
            UiFlag::ShowTimeButtons => &mut flags.show_time_buttons,
            UiFlag::ShowObservingPanelTabsButtons => &mut flags.show_observing_panel_tabs_buttons,
            UiFlag::ShowSelectedInfoButtons => &mut flags.show_selected_info_buttons,
            UiFlag::ShowFps => &mut flags.show_fps,
            UiFlag::ShowEquatorialJ2000GridButton => &mut flags.show_equatorial_j2000_grid_button,
            UiFlag::Fullscreen => &mut flags.fullscreen,
            UiFlag::Nightmode => &mut flags.nightmode,
            UiFlag::WasmSupport => &mut flags.wasm_support,
        }
    }
}

/// Complete application state held by the [`StateStore`](super::StateStore).
///
/// Only the store mutates it; collaborators read it through
/// [`StateStore::state`](super::StateStore::state) or serialize a snapshot.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    /// Opaque engine state tree, replaced wholesale by the engine bridge.
    pub stel: serde_json::Value,
    pub auto_detected_location: LocationRecord,
    pub current_location: LocationRecord,
    pub use_auto_location: bool,
    pub selected_object: Option<serde_json::Value>,
    pub accel_state: bool,
    #[serde(flatten)]
    pub flags: UiFlags,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            stel: serde_json::Value::Null,
            auto_detected_location: LocationRecord::default(),
            current_location: LocationRecord::default(),
            use_auto_location: true,
            selected_object: None,
            accel_state: false,
            flags: UiFlags::default(),
        }
    }
}
