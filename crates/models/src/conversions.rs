//! Value object <-> column conversions.
//!
//! Each value object maps to one primitive column type. Writing never fails;
//! reading re-runs the value object's constructor, so a row that no longer
//! satisfies the rules surfaces as a `ValidationError` instead of a broken
//! value. `from_column(to_column(x)) == x` holds for every registered type.
//!
//! The registry is filled once at startup and only read afterwards.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::validation::ValidationError;
use domain::{CreatedAt, Email, Id, UtcDateTime};

use crate::errors::ModelError;

pub trait ColumnConversion: Sized {
    type Column;

    fn to_column(&self) -> Self::Column;
    fn from_column(column: Self::Column) -> Result<Self, ValidationError>;
}

impl ColumnConversion for Id {
    type Column = String;

    fn to_column(&self) -> String {
        self.value().to_string()
    }

    fn from_column(column: String) -> Result<Self, ValidationError> {
        Id::new(column)
    }
}

impl ColumnConversion for Email {
    type Column = String;

    fn to_column(&self) -> String {
        self.value().to_string()
    }

    fn from_column(column: String) -> Result<Self, ValidationError> {
        Email::new(&column)
    }
}

impl ColumnConversion for UtcDateTime {
    type Column = DateTime<Utc>;

    fn to_column(&self) -> DateTime<Utc> {
        self.value()
    }

    fn from_column(column: DateTime<Utc>) -> Result<Self, ValidationError> {
        UtcDateTime::new(column)
    }
}

impl ColumnConversion for CreatedAt {
    type Column = DateTime<Utc>;

    fn to_column(&self) -> DateTime<Utc> {
        self.value()
    }

    fn from_column(column: DateTime<Utc>) -> Result<Self, ValidationError> {
        CreatedAt::new(column)
    }
}

/// Named pair of conversion functions for one value object type.
pub struct Converter<T: ColumnConversion> {
    pub name: &'static str,
    to_column: fn(&T) -> T::Column,
    from_column: fn(T::Column) -> Result<T, ValidationError>,
}

impl<T: ColumnConversion> Converter<T> {
    pub fn new(name: &'static str) -> Self {
        Self { name, to_column: T::to_column, from_column: T::from_column }
    }

    pub fn to_column(&self, value: &T) -> T::Column {
        (self.to_column)(value)
    }

    pub fn from_column(&self, column: T::Column) -> Result<T, ValidationError> {
        (self.from_column)(column)
    }

    pub fn to_nullable_column(&self, value: Option<&T>) -> Option<T::Column> {
        value.map(|v| self.to_column(v))
    }

    /// NULL stays `None` without running the constructor.
    pub fn from_nullable_column(&self, column: Option<T::Column>) -> Result<Option<T>, ValidationError> {
        column.map(|c| self.from_column(c)).transpose()
    }
}

#[derive(Default)]
pub struct ConversionRegistry {
    converters: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every value object of the `domain` crate.
    pub fn with_value_objects() -> Self {
        let mut registry = Self::new();
        registry
            .register::<Id>("id")
            .register::<Email>("email")
            .register::<UtcDateTime>("utc_date_time")
            .register::<CreatedAt>("created_at");
        registry
    }

    pub fn register<T>(&mut self, name: &'static str) -> &mut Self
    where
        T: ColumnConversion + 'static,
        T::Column: 'static,
    {
        self.converters.insert(TypeId::of::<T>(), Box::new(Converter::<T>::new(name)));
        self
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    pub fn get<T>(&self) -> Result<&Converter<T>, ModelError>
    where
        T: ColumnConversion + 'static,
        T::Column: 'static,
    {
        self.converters
            .get(&TypeId::of::<T>())
            .and_then(|c| c.downcast_ref::<Converter<T>>())
            .ok_or(ModelError::UnregisteredConversion(type_name::<T>()))
    }

    pub fn to_column<T>(&self, value: &T) -> Result<T::Column, ModelError>
    where
        T: ColumnConversion + 'static,
        T::Column: 'static,
    {
        Ok(self.get::<T>()?.to_column(value))
    }

    pub fn from_column<T>(&self, column: T::Column) -> Result<T, ModelError>
    where
        T: ColumnConversion + 'static,
        T::Column: 'static,
    {
        Ok(self.get::<T>()?.from_column(column)?)
    }

    pub fn to_nullable_column<T>(&self, value: Option<&T>) -> Result<Option<T::Column>, ModelError>
    where
        T: ColumnConversion + 'static,
        T::Column: 'static,
    {
        Ok(self.get::<T>()?.to_nullable_column(value))
    }

    pub fn from_nullable_column<T>(&self, column: Option<T::Column>) -> Result<Option<T>, ModelError>
    where
        T: ColumnConversion + 'static,
        T::Column: 'static,
    {
        Ok(self.get::<T>()?.from_nullable_column(column)?)
    }

    /// Required column read: NULL is a precondition violation, not a
    /// validation failure.
    pub fn from_required_column<T>(&self, column: Option<T::Column>) -> Result<T, ModelError>
    where
        T: ColumnConversion + 'static,
        T::Column: 'static,
    {
        let converter = self.get::<T>()?;
        let column = column.ok_or_else(|| {
            ModelError::Precondition(format!("column for {} is NULL", converter.name))
        })?;
        Ok(converter.from_column(column)?)
    }
}
