// SPDX-License-Identifier: MPL-2.0
#![doc = r#"
# Design Tokens

Colors, spacing and sizes shared by the editor screen and the toasts.

## Examples

```
use goru_frame::ui::design_tokens::{palette, opacity, sizing};
use iced::Color;

let hover_ring = Color {
    a: opacity::OVERLAY_MEDIUM,
    ..palette::PRIMARY_500
};

assert!(sizing::CONTROLS_WIDTH < sizing::FRAME_PREVIEW);
```
"#]

use iced::Color;

// ============================================================================
// Color Palette
// ============================================================================

pub mod palette {
    use super::Color;

    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const GRAY_700: Color = Color::from_rgb(0.333, 0.333, 0.333); // #555
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.8, 0.8, 0.8); // #ccc
    pub const GRAY_50: Color = Color::from_rgb(0.961, 0.961, 0.961); // #f5f5f5

    // Brand
    pub const ACCENT_500: Color = Color::from_rgb(1.0, 0.067, 0.282); // rgb(255, 17, 72)
    pub const PRIMARY_500: Color = Color::from_rgb(0.0, 0.439, 0.953); // #0070f3
    pub const PRIMARY_700: Color = Color::from_rgb(0.0, 0.318, 0.635); // #0051a2

    // Semantic
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
}

// ============================================================================
// Opacity Scale
// ============================================================================

pub mod opacity {
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
}

// ============================================================================
// Spacing Scale (8px grid)
// ============================================================================

pub mod spacing {
    pub const XXS: f32 = 4.0;
    pub const XS: f32 = 8.0;
    pub const SM: f32 = 12.0;
    pub const MD: f32 = 16.0;
    pub const LG: f32 = 24.0;
}

// ============================================================================
// Component Sizes
// ============================================================================

pub mod sizing {
    pub const BUTTON_HEIGHT: f32 = 36.0;
    pub const CONTROLS_WIDTH: f32 = 360.0;
    pub const TOAST_WIDTH: f32 = 320.0;
    /// Side of the on-screen frame preview, in logical pixels.
    pub const FRAME_PREVIEW: f32 = 458.0;
}

// ============================================================================
// Typography Scale
// ============================================================================

pub mod typography {
    pub const TITLE_LG: f32 = 30.0;
    pub const TITLE_SM: f32 = 18.0;
    pub const BODY: f32 = 14.0;
    pub const CAPTION: f32 = 12.0;
}

pub mod border {
    pub const WIDTH_SM: f32 = 1.0;
    pub const WIDTH_MD: f32 = 2.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
}

pub mod shadow {
    use super::palette;
    use iced::{Shadow, Vector};

    pub const NONE: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector::ZERO,
        blur_radius: 0.0,
    };

    pub const MD: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 4.0 },
        blur_radius: 8.0,
    };
}

// ============================================================================
// Compile-time Validation
// ============================================================================

const _: () = {
    assert!(spacing::XS > 0.0);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);

    assert!(opacity::OVERLAY_MEDIUM > opacity::OVERLAY_SUBTLE);
    assert!(sizing::CONTROLS_WIDTH < sizing::FRAME_PREVIEW);

    assert!(typography::TITLE_LG > typography::TITLE_SM);
    assert!(typography::BODY > typography::CAPTION);

    assert!(border::WIDTH_MD > border::WIDTH_SM);
};
