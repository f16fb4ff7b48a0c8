//! A small offset-relocating byte serializer.
//!
//! Used to rebuild tables (such as gvar) that contain internal offsets when the contents
//! of the table are reordered or resized during patch application. Objects are built up
//! incrementally via [`Serializer::push`]/[`Serializer::pop_pack`], and inter-object offsets
//! are patched into the output once the final layout is known.
//!
//! Loosely ported from the Harfbuzz serializer:
//! <https://github.com/harfbuzz/harfbuzz/blob/main/src/hb-serialize.hh>

use std::ops::Range;

use write_fonts::types::Scalar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub(crate) struct SerializeErrorFlags(u16);

#[allow(dead_code)]
impl SerializeErrorFlags {
    pub const SERIALIZE_ERROR_NONE: Self = Self(0x0000);
    pub const SERIALIZE_ERROR_OTHER: Self = Self(0x0001);
    pub const SERIALIZE_ERROR_OFFSET_OVERFLOW: Self = Self(0x0002);
    pub const SERIALIZE_ERROR_OUT_OF_ROOM: Self = Self(0x0004);
}

impl std::ops::BitOrAssign for SerializeErrorFlags {
    #[inline]
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl std::ops::Not for SerializeErrorFlags {
    type Output = bool;
    #[inline]
    fn not(self) -> bool {
        self == SerializeErrorFlags::SERIALIZE_ERROR_NONE
    }
}

/// Offset relative to the start of the finished buffer (`Head`), the end (`Tail`), or
/// not biased at all (`Absolute`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum OffsetWhence {
    #[default]
    Head,
    Tail,
    Absolute,
}

pub(crate) type ObjIdx = u32;

struct InProgressObject {
    start: usize,
    comes_before: Vec<ObjIdx>,
}

struct PackedObject {
    bytes: Vec<u8>,
    comes_before: Vec<ObjIdx>,
}

struct PendingLink {
    position: Range<usize>,
    target: ObjIdx,
    whence: OffsetWhence,
    bias: u32,
    is_signed: bool,
}

/// Incrementally builds a byte buffer made up of a root region plus a set of packed
/// sub-objects, with offsets between them resolved once the final object order is known.
#[allow(dead_code)]
pub(crate) struct Serializer {
    data: Vec<u8>,
    errors: SerializeErrorFlags,
    stack: Vec<InProgressObject>,
    objects: Vec<PackedObject>,
    links: Vec<PendingLink>,
    root_len: Option<usize>,
}

#[allow(dead_code)]
impl Serializer {
    pub(crate) fn new(size_hint: u32) -> Self {
        Serializer {
            data: Vec::with_capacity(size_hint as usize),
            errors: SerializeErrorFlags::SERIALIZE_ERROR_NONE,
            stack: Vec::new(),
            objects: Vec::new(),
            links: Vec::new(),
            root_len: None,
        }
    }

    pub(crate) fn successful(&self) -> bool {
        !self.errors
    }

    pub(crate) fn in_error(&self) -> bool {
        !self.successful()
    }

    pub(crate) fn error(&self) -> SerializeErrorFlags {
        self.errors
    }

    fn set_err(&mut self, error_type: SerializeErrorFlags) -> SerializeErrorFlags {
        self.errors |= error_type;
        self.errors
    }

    /// Marks the start of the root object. A no-op beyond checking for a prior error,
    /// kept to mirror the Harfbuzz API this is ported from.
    pub(crate) fn start_serialize(&mut self) -> Result<(), SerializeErrorFlags> {
        if self.in_error() {
            return Err(self.errors);
        }
        Ok(())
    }

    /// Embeds a single scalar value into the currently active object.
    pub(crate) fn embed(&mut self, obj: impl Scalar) -> Result<usize, SerializeErrorFlags> {
        self.embed_bytes(obj.to_raw().as_ref())
    }

    /// Embeds raw bytes into the currently active object, returning their start offset
    /// within that object (or the root, if no object is active).
    pub(crate) fn embed_bytes(&mut self, bytes: &[u8]) -> Result<usize, SerializeErrorFlags> {
        if self.in_error() {
            return Err(self.errors);
        }
        let base = self.stack.last().map(|o| o.start).unwrap_or(0);
        let start = self.data.len();
        self.data.extend_from_slice(bytes);
        Ok(start - base)
    }

    /// Starts a new nested object. Bytes embedded after this call belong to the new
    /// object until it is finished with [`Serializer::pop_pack`].
    pub(crate) fn push(&mut self) -> Result<(), SerializeErrorFlags> {
        if self.in_error() {
            return Err(self.errors);
        }
        self.stack.push(InProgressObject {
            start: self.data.len(),
            comes_before: Vec::new(),
        });
        Ok(())
    }

    /// Records that the object currently being built must appear before `target` in the
    /// final output, without creating an actual offset field.
    pub(crate) fn add_virtual_link(&mut self, target: ObjIdx) {
        if let Some(top) = self.stack.last_mut() {
            top.comes_before.push(target);
        }
    }

    /// Finishes the object started by the innermost unmatched [`Serializer::push`],
    /// returning an id that can be used as the target of a later [`Serializer::add_link`].
    ///
    /// When `share` is true, an identical already-packed object is reused instead of
    /// creating a duplicate.
    pub(crate) fn pop_pack(&mut self, share: bool) -> Option<ObjIdx> {
        let in_progress = self.stack.pop()?;
        let bytes = self.data.split_off(in_progress.start);

        if share {
            if let Some(existing) = self.objects.iter().position(|o| {
                o.bytes == bytes && o.comes_before == in_progress.comes_before
            }) {
                return Some(existing as ObjIdx);
            }
        }

        self.objects.push(PackedObject {
            bytes,
            comes_before: in_progress.comes_before,
        });
        Some((self.objects.len() - 1) as ObjIdx)
    }

    /// Records that the bytes at `position` (within whatever is currently being
    /// serialized) should be overwritten with an offset to `target` once the final
    /// layout is known.
    pub(crate) fn add_link(
        &mut self,
        position: Range<usize>,
        target: ObjIdx,
        whence: OffsetWhence,
        bias: u32,
        is_signed: bool,
    ) -> Result<(), SerializeErrorFlags> {
        if self.in_error() {
            return Err(self.errors);
        }
        self.links.push(PendingLink {
            position,
            target,
            whence,
            bias,
            is_signed,
        });
        Ok(())
    }

    /// Lays out all packed objects (respecting virtual-link ordering constraints),
    /// appends them to the root buffer, and resolves all pending offset links.
    pub(crate) fn end_serialize(&mut self) {
        if self.in_error() || self.root_len.is_some() {
            return;
        }

        let root_len = self.data.len();
        self.root_len = Some(root_len);

        let order = Self::topo_order(&self.objects);

        let mut offsets = vec![0usize; self.objects.len()];
        let mut cursor = root_len;
        for &idx in &order {
            offsets[idx as usize] = cursor;
            cursor += self.objects[idx as usize].bytes.len();
        }
        let total_len = cursor;

        for link in &self.links {
            let target_start = offsets[link.target as usize] as i64;
            let value = match link.whence {
                OffsetWhence::Head => target_start - root_len as i64,
                OffsetWhence::Tail => target_start - total_len as i64,
                OffsetWhence::Absolute => target_start,
            } + link.bias as i64;

            Self::write_offset(&mut self.data, link.position.clone(), value, link.is_signed);
        }

        for &idx in &order {
            let bytes = std::mem::take(&mut self.objects[idx as usize].bytes);
            self.data.extend_from_slice(&bytes);
        }
    }

    fn write_offset(data: &mut [u8], position: Range<usize>, value: i64, is_signed: bool) {
        let Some(slot) = data.get_mut(position.clone()) else {
            return;
        };
        let width = position.len();
        let bytes = if is_signed {
            value.to_be_bytes()
        } else {
            (value as u64).to_be_bytes()
        };
        // big endian: the low-order `width` bytes are the trailing bytes of the i64/u64 repr.
        slot.copy_from_slice(&bytes[bytes.len() - width..]);
    }

    /// Orders packed objects so that every `comes_before` constraint is satisfied,
    /// falling back to pack order when unconstrained.
    fn topo_order(objects: &[PackedObject]) -> Vec<ObjIdx> {
        let n = objects.len();
        let mut in_degree = vec![0usize; n];
        for obj in objects {
            for &t in &obj.comes_before {
                in_degree[t as usize] += 1;
            }
        }

        let mut ready: Vec<ObjIdx> = (0..n as ObjIdx).filter(|&i| in_degree[i as usize] == 0).collect();
        let mut order = Vec::with_capacity(n);
        let mut next_ready = Vec::new();

        while !ready.is_empty() {
            ready.sort_unstable();
            for idx in ready.drain(..) {
                order.push(idx);
                for &t in &objects[idx as usize].comes_before {
                    in_degree[t as usize] -= 1;
                    if in_degree[t as usize] == 0 {
                        next_ready.push(t);
                    }
                }
            }
            std::mem::swap(&mut ready, &mut next_ready);
        }

        order
    }

    /// Consumes the serializer, returning the finished buffer.
    pub(crate) fn copy_bytes(self) -> Result<Vec<u8>, SerializeErrorFlags> {
        if !self.successful() {
            return Err(self.errors);
        }
        Ok(self.data)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn root_only() {
        let mut s = Serializer::new(16);
        s.start_serialize().unwrap();
        s.embed_bytes(&[1, 2, 3]).unwrap();
        s.end_serialize();
        assert_eq!(s.copy_bytes().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn nested_object_with_link() {
        let mut s = Serializer::new(16);
        s.start_serialize().unwrap();
        // two root bytes reserved for an offset to the nested object.
        s.embed_bytes(&[0, 0]).unwrap();

        s.push().unwrap();
        s.embed_bytes(&[0xAB, 0xCD]).unwrap();
        let obj = s.pop_pack(false).unwrap();

        s.add_link(0..2, obj, OffsetWhence::Head, 0, false).unwrap();
        s.end_serialize();

        let out = s.copy_bytes().unwrap();
        assert_eq!(out, vec![0, 2, 0xAB, 0xCD]);
    }

    #[test]
    fn virtual_link_forces_ordering() {
        let mut s = Serializer::new(16);
        s.start_serialize().unwrap();

        s.push().unwrap();
        s.embed_bytes(&[1]).unwrap();
        let second = s.pop_pack(false).unwrap();

        s.push().unwrap();
        s.embed_bytes(&[2]).unwrap();
        s.add_virtual_link(second);
        let first = s.pop_pack(false).unwrap();

        s.end_serialize();
        let out = s.copy_bytes().unwrap();
        // `first` was packed after `second` but the virtual link forces it to be
        // emitted first in the final layout.
        assert_eq!(out, vec![2, 1]);
        let _ = first;
    }
}
