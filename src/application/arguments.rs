//! Typed decoding of raw argument lists.
//!
//! `HubArguments` is implemented for `()` (unit payload), tuples of one to
//! sixteen elements, and [`Single<T>`] (a bare value). The arity is a
//! compile-time constant, so one generic bridge serves every shape.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::foundation::ConversionError;
use crate::ports::ArgumentConverter;

/// Largest supported argument count.
pub const MAX_ARITY: usize = 16;

/// How a raw argument count that differs from the declared arity is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArityPolicy {
    /// Any count other than the declared arity is a conversion error.
    #[default]
    Strict,
    /// Missing trailing arguments decode as missing (the type's default);
    /// surplus arguments are ignored.
    Lenient,
}

impl ArityPolicy {
    /// Checks `actual` against `expected`.
    pub fn check(&self, expected: usize, actual: usize) -> Result<(), ConversionError> {
        match self {
            ArityPolicy::Strict if actual != expected => {
                Err(ConversionError::ArityMismatch { expected, actual })
            }
            _ => Ok(()),
        }
    }
}

/// A statically typed shape for the arguments of one named event.
pub trait HubArguments: 'static {
    /// Value handed to observers.
    type Output: Send + 'static;

    /// Number of raw arguments the shape consumes.
    const ARITY: usize;

    /// Decodes `args` position by position. A position past the end of
    /// `args` is treated as missing.
    fn decode<C>(args: &[Value], converter: &C) -> Result<Self::Output, ConversionError>
    where
        C: ArgumentConverter;
}

/// Marker shape for a single argument delivered as a bare `T`.
pub struct Single<T>(PhantomData<fn() -> T>);

impl<T> HubArguments for Single<T>
where
    T: DeserializeOwned + Default + Send + 'static,
{
    type Output = T;
    const ARITY: usize = 1;

    fn decode<C>(args: &[Value], converter: &C) -> Result<T, ConversionError>
    where
        C: ArgumentConverter,
    {
        converter.convert::<T>(args.first(), 0)
    }
}

macro_rules! impl_hub_arguments {
    ($arity:expr $(; $($ty:ident : $idx:tt),+)?) => {
        impl$(<$($ty),+>)? HubArguments for ($($($ty,)+)?)
        $(where $($ty: DeserializeOwned + Default + Send + 'static),+)?
        {
            type Output = Self;
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            fn decode<C>(args: &[Value], converter: &C) -> Result<Self, ConversionError>
            where
                C: ArgumentConverter,
            {
                Ok(($($(converter.convert::<$ty>(args.get($idx), $idx)?,)+)?))
            }
        }
    };
}

impl_hub_arguments!(0);
impl_hub_arguments!(1; T1: 0);
impl_hub_arguments!(2; T1: 0, T2: 1);
impl_hub_arguments!(3; T1: 0, T2: 1, T3: 2);
impl_hub_arguments!(4; T1: 0, T2: 1, T3: 2, T4: 3);
impl_hub_arguments!(5; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4);
impl_hub_arguments!(6; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5);
impl_hub_arguments!(7; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6);
impl_hub_arguments!(8; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7);
impl_hub_arguments!(9; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7, T9: 8);
impl_hub_arguments!(10; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7, T9: 8, T10: 9);
impl_hub_arguments!(11; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7, T9: 8, T10: 9, T11: 10);
impl_hub_arguments!(12; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7, T9: 8, T10: 9, T11: 10, T12: 11);
impl_hub_arguments!(13; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7, T9: 8, T10: 9, T11: 10, T12: 11, T13: 12);
impl_hub_arguments!(14; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7, T9: 8, T10: 9, T11: 10, T12: 11, T13: 12, T14: 13);
impl_hub_arguments!(15; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7, T9: 8, T10: 9, T11: 10, T12: 11, T13: 12, T14: 13, T15: 14);
impl_hub_arguments!(16; T1: 0, T2: 1, T3: 2, T4: 3, T5: 4, T6: 5, T7: 6, T8: 7, T9: 8, T10: 9, T11: 10, T12: 11, T13: 12, T14: 13, T15: 14, T16: 15);
