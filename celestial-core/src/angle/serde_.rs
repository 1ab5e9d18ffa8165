use super::Angle;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// Serialized as plain radians so reports stay unit-consistent with `Angle::radians`.
impl Serialize for Angle {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(self.radians())
    }
}

impl<'de> Deserialize<'de> for Angle {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        f64::deserialize(d).map(Angle::from_radians)
    }
}
