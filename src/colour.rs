// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps iteration counts to colours.  Low counts fade from white
//! through pink toward red; higher counts climb from red back toward
//! yellow.

use num::clamp;

/// The last count on the white-to-red ramp.
pub const RAMP_END: u32 = 63;

/// A count that is always painted pure white, whichever ramp it would
/// otherwise fall on.
pub const WHITE_OVERRIDE: u32 = 320;

/// The RGB triple for an iteration count.
pub fn map_colour(count: u32) -> [u8; 3] {
    if count == WHITE_OVERRIDE {
        return [255, 255, 255];
    }
    if count <= RAMP_END {
        let fade = clamp(255 - 4 * count as i64, 0, 255) as u8;
        [255, fade, fade]
    } else {
        [255, clamp(count - RAMP_END, 0, 255) as u8, 0]
    }
}
