//! Every user-facing string in one place.

pub struct UiText {
    // Side panel headings
    pub chart_load_heading: &'static str,
    pub replay_heading: &'static str,
    pub trade_heading: &'static str,
    pub gap_heading: &'static str,
    pub events_heading: &'static str,
    pub earnings_heading: &'static str,

    // Selector labels
    pub ticker_heading: &'static str,
    pub date_heading: &'static str,
    pub timeframe_label: &'static str,
    pub restrict_hours_label: &'static str,
    pub start_time_label: &'static str,
    pub start_time_hint: &'static str,
    pub speed_label: &'static str,
    pub gap_size_label: &'static str,
    pub gap_day_label: &'static str,
    pub gap_direction_label: &'static str,
    pub event_type_label: &'static str,
    pub event_year_label: &'static str,
    pub earnings_bin_label: &'static str,

    // Buttons
    pub load_chart_button: &'static str,
    pub start_button: &'static str,
    pub resume_button: &'static str,
    pub pause_button: &'static str,
    pub start_over_button: &'static str,
    pub step_back_button: &'static str,
    pub step_forward_button: &'static str,
    pub buy_button: &'static str,
    pub sell_button: &'static str,
    pub find_dates_button: &'static str,
    pub get_insights_button: &'static str,

    // Trade desk
    pub open_position_label: &'static str,
    pub flat_label: &'static str,
    pub unrealized_label: &'static str,
    pub realized_label: &'static str,
    pub trade_history_heading: &'static str,
    pub no_trades_label: &'static str,

    // Status messages
    pub no_chart_loaded: &'static str,
    pub loading_chart: &'static str,
    pub replay_finished: &'static str,
    pub budget_label: &'static str,
    pub budget_exhausted_prefix: &'static str,
    pub no_dates_found: &'static str,
    pub insights_heading: &'static str,
}

pub static UI_TEXT: UiText = UiText {
    chart_load_heading: "Chart",
    replay_heading: "Replay",
    trade_heading: "Paper Trading",
    gap_heading: "Gap Analysis",
    events_heading: "Macro Events",
    earnings_heading: "Earnings",

    ticker_heading: "Ticker",
    date_heading: "Date",
    timeframe_label: "Timeframe",
    restrict_hours_label: "Regular hours only (09:30-16:00)",
    start_time_label: "Start at",
    start_time_hint: "HH:MM",
    speed_label: "Speed",
    gap_size_label: "Gap size",
    gap_day_label: "Day",
    gap_direction_label: "Direction",
    event_type_label: "Event type",
    event_year_label: "Year",
    earnings_bin_label: "Earnings result",

    load_chart_button: "Load chart",
    start_button: "▶ Start",
    resume_button: "▶ Resume",
    pause_button: "⏸ Pause",
    start_over_button: "⏮ Start over",
    step_back_button: "◀ -1m",
    step_forward_button: "+1m ▶",
    buy_button: "Buy",
    sell_button: "Sell",
    find_dates_button: "Find dates",
    get_insights_button: "Get insights",

    open_position_label: "Open position",
    flat_label: "Flat",
    unrealized_label: "Unrealized P/L",
    realized_label: "Realized P/L",
    trade_history_heading: "Closed trades",
    no_trades_label: "No trades yet",

    no_chart_loaded: "Load a chart to begin",
    loading_chart: "Loading chart data",
    replay_finished: "End of session",
    budget_label: "Actions left",
    budget_exhausted_prefix: "Action limit reached, try again in ",
    no_dates_found: "No dates found for the selected criteria",
    insights_heading: "Gap insights",
};
