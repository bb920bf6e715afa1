use nalgebra::Point2;

use crate::error::GeodeticError;
use crate::format::{format_latitude, format_longitude, group_thousands};
use crate::geo::{Datum, GeoPoint, GroundPoint};
#[cfg(feature = "geodesy")]
use crate::proj::GeodesyProjection;
use crate::proj::{Projection, TransverseMercator};

/// Id of the built-in geographic (latitude/longitude) coordinate display.
pub const GEOGRAPHIC: &str = "latlon";
/// Id of the built-in UTM coordinate display.
pub const UTM: &str = "utm";
/// Id of the built-in Gauss-Krüger coordinate display.
pub const GAUSS_KRUEGER: &str = "gauss_krueger";

/// Kind of a registered coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProjectionKind {
    /// Coordinates are displayed as geographic degrees.
    Geographic,
    /// Coordinates are displayed as projected meters.
    Projected,
}

/// Description of a registered coordinate system, as offered to selection UIs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectionDescriptor {
    id: String,
    name: String,
    kind: ProjectionKind,
    x_axis_label: String,
    y_axis_label: String,
}

impl ProjectionDescriptor {
    fn new(id: &str, name: &str, kind: ProjectionKind, x_label: &str, y_label: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            x_axis_label: x_label.into(),
            y_axis_label: y_label.into(),
        }
    }

    /// Stable id used to select this projection.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the coordinate system.
    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    /// Label of the first (easting/longitude) axis.
    pub fn x_axis_label(&self) -> &str {
        &self.x_axis_label
    }

    /// Label of the second (northing/latitude) axis.
    pub fn y_axis_label(&self) -> &str {
        &self.y_axis_label
    }
}

/// Geographic coordinates in degrees, as returned by the inverse transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// Formatted coordinates ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayCoords {
    /// Easting or longitude, formatted.
    pub x: String,
    /// Northing or latitude, formatted.
    pub y: String,
    /// Zone designator for zoned systems (`"33N"` for UTM, `"5"` for Gauss-Krüger).
    pub zone: Option<String>,
}

enum Backend {
    Geographic,
    Utm,
    GaussKrueger,
    #[cfg(feature = "geodesy")]
    Custom(Option<GeodesyProjection<GroundPoint, Point2<f64>>>),
}

struct RegistryEntry {
    descriptor: ProjectionDescriptor,
    backend: Backend,
}

/// Registry of coordinate systems available for coordinate display and search tools.
///
/// One registered system is "current" at a time; display collaborators format through the
/// current one, while measurement units address systems by id directly.
pub struct ProjectionRegistry {
    datum: Datum,
    entries: Vec<RegistryEntry>,
    current: usize,
    decimals: usize,
    last_utm_zone: Option<(u8, bool)>,
}

impl ProjectionRegistry {
    /// Creates a registry with the built-in systems (geographic, UTM, Gauss-Krüger) on the
    /// given datum.
    pub fn new(datum: Datum) -> Self {
        let entries = vec![
            RegistryEntry {
                descriptor: ProjectionDescriptor::new(
                    GEOGRAPHIC,
                    "Geographic (WGS84)",
                    ProjectionKind::Geographic,
                    "Longitude",
                    "Latitude",
                ),
                backend: Backend::Geographic,
            },
            RegistryEntry {
                descriptor: ProjectionDescriptor::new(
                    UTM,
                    "UTM",
                    ProjectionKind::Projected,
                    "Easting",
                    "Northing",
                ),
                backend: Backend::Utm,
            },
            RegistryEntry {
                descriptor: ProjectionDescriptor::new(
                    GAUSS_KRUEGER,
                    "Gauss-Krüger",
                    ProjectionKind::Projected,
                    "Easting",
                    "Northing",
                ),
                backend: Backend::GaussKrueger,
            },
        ];

        Self {
            datum,
            entries,
            current: 0,
            decimals: 4,
            last_utm_zone: None,
        }
    }

    /// Registers a coordinate system defined by a [`geodesy`] operator definition string.
    ///
    /// A definition the transform library cannot parse is still registered; projecting
    /// through it falls back to plain geographic formatting instead of failing.
    #[cfg(feature = "geodesy")]
    pub fn register_custom(&mut self, id: &str, name: &str, definition: &str) {
        let projection = GeodesyProjection::new(definition);
        if projection.is_none() {
            log::warn!("projection definition for {id:?} is malformed, will fall back to geographic display");
        }

        self.entries.push(RegistryEntry {
            descriptor: ProjectionDescriptor::new(
                id,
                name,
                ProjectionKind::Projected,
                "Easting",
                "Northing",
            ),
            backend: Backend::Custom(projection),
        });
    }

    /// Descriptors of all registered systems.
    pub fn projections(&self) -> impl Iterator<Item = &ProjectionDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Descriptor of the system with the given id.
    pub fn descriptor(&self, id: &str) -> Option<&ProjectionDescriptor> {
        self.entries
            .iter()
            .map(|entry| &entry.descriptor)
            .find(|descriptor| descriptor.id() == id)
    }

    /// Descriptor of the currently selected system.
    pub fn current(&self) -> &ProjectionDescriptor {
        &self.entries[self.current].descriptor
    }

    /// Selects the system with the given id. Returns `false` (keeping the previous
    /// selection) if no such system is registered.
    pub fn set_current(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|e| e.descriptor.id() == id) {
            Some(index) => {
                self.current = index;
                true
            }
            None => false,
        }
    }

    /// Sets the number of decimal digits used for geographic display.
    pub fn set_decimals(&mut self, decimals: usize) {
        self.decimals = decimals;
    }

    /// Derives the UTM zone for the given longitude.
    pub fn utm_zone(lon: f64) -> u8 {
        (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8
    }

    /// Derives the Gauss-Krüger zone for the given longitude.
    pub fn gauss_krueger_zone(lon: f64) -> u8 {
        (((lon - 1.5) / 3.0).floor() as i32 + 1).clamp(1, 60) as u8
    }

    /// Converts geographic degrees into the target system and formats the result for
    /// display.
    ///
    /// `NaN` inputs are treated as `0` so that a live marker can still be placed; stored
    /// geometries are never rewritten by this path. If the target system cannot transform
    /// the input, the result falls back to plain geographic formatting.
    pub fn project(&mut self, lon: f64, lat: f64, projection_id: &str) -> DisplayCoords {
        let lon = if lon.is_nan() { 0.0 } else { lon };
        let lat = if lat.is_nan() { 0.0 } else { lat };

        let Some(entry) = self.entries.iter().find(|e| e.descriptor.id() == projection_id)
        else {
            log::warn!("projection {projection_id:?} is not registered, falling back to geographic display");
            return self.geographic_coords(lon, lat);
        };

        let point = GroundPoint::new(lat, lon);
        match &entry.backend {
            Backend::Geographic => self.geographic_coords(lon, lat),
            Backend::Utm => {
                let zone = Self::utm_zone(lon);
                let southern = lat < 0.0;
                let projection: TransverseMercator<GroundPoint, Point2<f64>> =
                    TransverseMercator::utm(self.datum, zone, southern);
                match projection.project(&point) {
                    Some(projected) => {
                        self.last_utm_zone = Some((zone, southern));
                        DisplayCoords {
                            x: group_thousands(projected.x, 2),
                            y: group_thousands(projected.y, 2),
                            zone: Some(format!(
                                "{zone}{}",
                                if southern { 'S' } else { 'N' }
                            )),
                        }
                    }
                    None => self.geographic_coords(lon, lat),
                }
            }
            Backend::GaussKrueger => {
                let zone = Self::gauss_krueger_zone(lon);
                let projection: TransverseMercator<GroundPoint, Point2<f64>> =
                    TransverseMercator::gauss_krueger(self.datum, zone);
                match projection.project(&point) {
                    Some(projected) => DisplayCoords {
                        x: group_thousands(projected.x, 2),
                        y: group_thousands(projected.y, 2),
                        zone: Some(zone.to_string()),
                    },
                    None => self.geographic_coords(lon, lat),
                }
            }
            #[cfg(feature = "geodesy")]
            Backend::Custom(projection) => {
                match projection.as_ref().and_then(|p| p.project(&point)) {
                    Some(projected) => DisplayCoords {
                        x: group_thousands(projected.x, 2),
                        y: group_thousands(projected.y, 2),
                        zone: None,
                    },
                    None => {
                        log::warn!(
                            "transform through {projection_id:?} failed, falling back to geographic display"
                        );
                        self.geographic_coords(lon, lat)
                    }
                }
            }
        }
    }

    /// Inverse transform: converts projected coordinates of the given system back into
    /// geographic degrees.
    pub fn to_geographic(
        &self,
        east: f64,
        north: f64,
        projection_id: &str,
    ) -> Result<LatLon, GeodeticError> {
        let east = if east.is_nan() { 0.0 } else { east };
        let north = if north.is_nan() { 0.0 } else { north };

        let entry = self
            .entries
            .iter()
            .find(|e| e.descriptor.id() == projection_id)
            .ok_or_else(|| GeodeticError::UnknownProjection(projection_id.into()))?;

        let projected = Point2::new(east, north);
        match &entry.backend {
            Backend::Geographic => Ok(LatLon {
                lat: north,
                lon: east,
            }),
            Backend::Utm => {
                let (zone, southern) = self.last_utm_zone.ok_or(GeodeticError::ZoneUnknown)?;
                let projection: TransverseMercator<GroundPoint, Point2<f64>> =
                    TransverseMercator::utm(self.datum, zone, southern);
                let point = projection
                    .unproject(&projected)
                    .ok_or(GeodeticError::TransformFailed)?;
                Ok(LatLon {
                    lat: point.lat(),
                    lon: point.lon(),
                })
            }
            Backend::GaussKrueger => {
                // The zone is recovered from the leading digit of the easting, which the
                // false easting embeds. Known limitation: this is only unambiguous for
                // single-digit zone numbers (1-9); kept as is for compatibility with
                // existing coordinate strings.
                let zone = (east / 1_000_000.0).floor();
                if !(1.0..=9.0).contains(&zone) {
                    return Err(GeodeticError::ZoneUnknown);
                }

                let projection: TransverseMercator<GroundPoint, Point2<f64>> =
                    TransverseMercator::gauss_krueger(self.datum, zone as u8);
                let point = projection
                    .unproject(&projected)
                    .ok_or(GeodeticError::TransformFailed)?;
                Ok(LatLon {
                    lat: point.lat(),
                    lon: point.lon(),
                })
            }
            #[cfg(feature = "geodesy")]
            Backend::Custom(projection) => {
                let point = projection
                    .as_ref()
                    .and_then(|p| p.unproject(&projected))
                    .ok_or(GeodeticError::TransformFailed)?;
                Ok(LatLon {
                    lat: point.lat(),
                    lon: point.lon(),
                })
            }
        }
    }

    fn geographic_coords(&self, lon: f64, lat: f64) -> DisplayCoords {
        DisplayCoords {
            x: format_longitude(lon, self.decimals),
            y: format_latitude(lat, self.decimals),
            zone: None,
        }
    }
}

impl Default for ProjectionRegistry {
    fn default() -> Self {
        Self::new(Datum::WGS84)
    }
}
