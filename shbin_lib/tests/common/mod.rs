//! Builders for small synthetic `.shbin` files.

const DVLE_HEADER_SIZE: usize = 0x40;

pub struct TestConstant {
    pub kind: u8,
    pub id: u8,
    pub len: u8,
    pub payload: [u32; 4],
}

impl TestConstant {
    pub fn float(id: u8, len: u8, payload: [u32; 4]) -> Self {
        Self {
            kind: 2,
            id,
            len,
            payload,
        }
    }

    pub fn int(id: u8, values: [u8; 4]) -> Self {
        Self {
            kind: 1,
            id,
            len: 1,
            payload: [u32::from_le_bytes(values), 0, 0, 0],
        }
    }

    pub fn bool(id: u8, value: u8) -> Self {
        Self {
            kind: 0,
            id,
            len: 1,
            payload: [value as u32, 0, 0, 0],
        }
    }
}

#[derive(Default)]
pub struct TestUnit {
    pub constants: Vec<TestConstant>,
    pub names: Vec<&'static str>,
}

impl TestUnit {
    pub fn to_bytes(&self) -> Vec<u8> {
        let constants_offset = DVLE_HEADER_SIZE;
        let inputs_offset = constants_offset + 20 * self.constants.len();
        let symbols_offset = inputs_offset + 8 * self.names.len();

        let mut bytes = vec![0u8; DVLE_HEADER_SIZE];
        bytes[0..4].copy_from_slice(b"DVLE");
        put_u32(&mut bytes, 0x18, constants_offset as u32);
        put_u32(&mut bytes, 0x1C, self.constants.len() as u32);
        put_u32(&mut bytes, 0x30, inputs_offset as u32);
        put_u32(&mut bytes, 0x34, self.names.len() as u32);
        put_u32(&mut bytes, 0x38, symbols_offset as u32);

        for c in &self.constants {
            bytes.extend_from_slice(&[c.kind, 0, c.id, c.len]);
            for word in c.payload {
                bytes.extend_from_slice(&word.to_le_bytes());
            }
        }

        let mut name_offset = 0u32;
        for (i, name) in self.names.iter().enumerate() {
            bytes.extend_from_slice(&name_offset.to_le_bytes());
            bytes.extend_from_slice(&(i as u16).to_le_bytes());
            bytes.extend_from_slice(&(i as u16).to_le_bytes());
            name_offset += name.len() as u32 + 1;
        }

        for name in &self.names {
            bytes.extend_from_slice(name.as_bytes());
            bytes.push(0);
        }

        bytes
    }
}

pub fn build_shbin(units: &[TestUnit]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"DVLB");
    bytes.extend_from_slice(&(units.len() as u32).to_le_bytes());

    let table_offset = bytes.len();
    bytes.resize(table_offset + 4 * units.len(), 0);

    for (i, unit) in units.iter().enumerate() {
        let base_offset = bytes.len() as u32;
        put_u32(&mut bytes, table_offset + 4 * i, base_offset);
        bytes.extend_from_slice(&unit.to_bytes());
    }

    bytes
}

pub fn put_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
