use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub selection_bg: Color,

    // Specific components
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub user_name: Style,
    pub user_handle: Style,
    pub following_button: Style,
    pub follow_button: Style,
    pub placeholder: Style,
    pub footer: Style,
    pub status: Style,
    pub error: Style,
    pub avatar_palette: [Color; 8],
    pub avatar_fallback: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: Color::DarkGray,
            text: Color::White,
            text_secondary: Color::Gray,
            selection_bg: Color::Rgb(40, 40, 40),

            tab_active: Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),
            user_name: Style::default().fg(Color::White),
            user_handle: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            following_button: Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD),
            follow_button: Style::default().fg(Color::White),
            placeholder: Style::default().fg(Color::Rgb(60, 60, 60)),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            status: Style::default().fg(Color::Cyan),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            avatar_palette: [
                Color::Cyan,
                Color::Magenta,
                Color::Yellow,
                Color::Green,
                Color::Blue,
                Color::LightRed,
                Color::LightCyan,
                Color::LightMagenta,
            ],
            avatar_fallback: Style::default().fg(Color::DarkGray),
        }
    }
}
