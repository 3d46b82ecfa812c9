//! Leveled assertions.
//!
//! Violations of internal invariants are programming errors and abort loudly. Expensive checks
//! are only compiled in at higher levels; the `debug-checks` feature raises the level to
//! [`FDPROP_ASSERT_EXTREME`].

#[cfg(not(feature = "debug-checks"))]
pub(crate) const FDPROP_ASSERT_LEVEL_DEFINITION: u8 = FDPROP_ASSERT_SIMPLE;
#[cfg(feature = "debug-checks")]
pub(crate) const FDPROP_ASSERT_LEVEL_DEFINITION: u8 = FDPROP_ASSERT_EXTREME;

pub(crate) const FDPROP_ASSERT_SIMPLE: u8 = 1;
pub(crate) const FDPROP_ASSERT_MODERATE: u8 = 2;
pub(crate) const FDPROP_ASSERT_ADVANCED: u8 = 3;
pub(crate) const FDPROP_ASSERT_EXTREME: u8 = 4;

macro_rules! print_fdprop_assert_warning_message {
    () => {
        if $crate::fdprop_asserts::FDPROP_ASSERT_LEVEL_DEFINITION
            >= $crate::fdprop_asserts::FDPROP_ASSERT_MODERATE
        {
            log::warn!(
                "Potential performance degradation: the assert level is set to {}, meaning many debug asserts are active.",
                $crate::fdprop_asserts::FDPROP_ASSERT_LEVEL_DEFINITION
            );
        };
    };
}

macro_rules! fdprop_assert_simple {
    ($($arg:tt)*) => {
        if $crate::fdprop_asserts::FDPROP_ASSERT_LEVEL_DEFINITION >= $crate::fdprop_asserts::FDPROP_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

macro_rules! fdprop_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::fdprop_asserts::FDPROP_ASSERT_LEVEL_DEFINITION >= $crate::fdprop_asserts::FDPROP_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

macro_rules! fdprop_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::fdprop_asserts::FDPROP_ASSERT_LEVEL_DEFINITION >= $crate::fdprop_asserts::FDPROP_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

macro_rules! fdprop_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::fdprop_asserts::FDPROP_ASSERT_LEVEL_DEFINITION >= $crate::fdprop_asserts::FDPROP_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

macro_rules! fdprop_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::fdprop_asserts::FDPROP_ASSERT_LEVEL_DEFINITION >= $crate::fdprop_asserts::FDPROP_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}

pub(crate) use fdprop_assert_advanced;
pub(crate) use fdprop_assert_eq_simple;
pub(crate) use fdprop_assert_extreme;
pub(crate) use fdprop_assert_moderate;
pub(crate) use fdprop_assert_simple;
pub(crate) use print_fdprop_assert_warning_message;
