//! Listener handles and the arena-backed listener list.
//!
//! Listeners live in a doubly linked list threaded through a `Vec` of slots.
//! Slot 0 is a sentinel head that never fires, so insertion and removal never
//! special-case an empty list. Links are slot indices rather than pointers,
//! which lets a dispatch loop hold a slot index across a listener callback
//! while that callback adds or removes listeners.
//!
//! Two rules keep an in-flight traversal valid:
//!
//! - Unlinking a slot leaves its `next` untouched, so a traversal parked on a
//!   removed slot still advances to the removed slot's former successor.
//! - While the list is pinned (a dispatch is running) unlinked slots are
//!   retired instead of freed; they are recycled only after the dispatch ends.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Signature of a ticker listener.
pub type ListenerFn = dyn Fn(&Tick<'_>) + Send + Sync;

/// Shareable handle to a listener function.
///
/// Cloning the handle shares identity: two handles compare equal only when
/// they were cloned from the same [`TickerCallback::new`] call. Removal uses
/// that identity, so keep a clone of the handle you registered.
#[derive(Clone)]
pub struct TickerCallback {
    func: Arc<ListenerFn>,
}

impl TickerCallback {
    /// Wrap a listener function.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Tick<'_>) + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Returns true when both handles refer to the same listener function.
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }

    pub(crate) fn call(&self, tick: &Tick<'_>) {
        (self.func)(tick);
    }
}

impl PartialEq for TickerCallback {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for TickerCallback {}

impl fmt::Debug for TickerCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickerCallback")
            .field("ptr", &Arc::as_ptr(&self.func).cast::<()>())
            .finish()
    }
}

/// Opaque receiver a listener is bound to.
///
/// A bound listener receives its context through [`Tick::context`] and is
/// only removed by a `remove` call naming the same callback and context.
/// Equality is identity of the shared allocation.
#[derive(Clone)]
pub struct ListenerContext {
    inner: Arc<dyn Any + Send + Sync>,
}

impl ListenerContext {
    /// Create a context owning `value`.
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Bind to an already shared value without copying it.
    pub fn from_arc<T>(value: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        Self { inner: value }
    }

    /// Borrow the context as `T`, if it holds one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns true when both handles refer to the same context.
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ListenerContext {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for ListenerContext {}

impl fmt::Debug for ListenerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerContext")
            .field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
            .finish()
    }
}

/// Timing of the tick currently being dispatched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FrameDelta {
    /// Scaled delta in frame units (`delta_ms * target_fpms`).
    pub(crate) delta_time: f64,
    /// Scaled, clamped delta in milliseconds.
    pub(crate) delta_ms: f64,
    /// Raw milliseconds since the previous tick, before clamping and scaling.
    pub(crate) elapsed_ms: f64,
}

/// Argument passed to every listener invocation.
#[derive(Debug, Clone, Copy)]
pub struct Tick<'a> {
    /// Scaled delta in frame units; `1.0` at the target frame rate.
    pub delta_time: f64,
    /// Scaled, clamped delta in milliseconds.
    pub delta_ms: f64,
    /// Raw milliseconds since the previous tick.
    pub elapsed_ms: f64,
    context: Option<&'a ListenerContext>,
}

impl<'a> Tick<'a> {
    pub(crate) const fn new(delta: FrameDelta, context: Option<&'a ListenerContext>) -> Self {
        Self {
            delta_time: delta.delta_time,
            delta_ms: delta.delta_ms,
            elapsed_ms: delta.elapsed_ms,
            context,
        }
    }

    /// Context the listener was bound to, if any.
    pub const fn context(&self) -> Option<&'a ListenerContext> {
        self.context
    }

    /// Bound context downcast to `T`.
    pub fn context_as<T: Any>(&self) -> Option<&'a T> {
        self.context.and_then(ListenerContext::downcast_ref::<T>)
    }
}

/// Index of a slot in the listener arena.
pub(crate) type SlotId = usize;

const HEAD: SlotId = 0;

struct Slot {
    callback: Option<TickerCallback>,
    context: Option<ListenerContext>,
    priority: i32,
    once: bool,
    active: bool,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl Slot {
    const fn head() -> Self {
        Self {
            callback: None,
            context: None,
            priority: i32::MAX,
            once: false,
            active: false,
            prev: None,
            next: None,
        }
    }

    fn matches(&self, callback: &TickerCallback, context: Option<&ListenerContext>) -> bool {
        let same_fn = self.callback.as_ref().is_some_and(|cb| cb.same(callback));
        let same_ctx = match (self.context.as_ref(), context) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same(b),
            _ => false,
        };
        same_fn && same_ctx
    }
}

/// Callback and context cloned out of a slot so it can be invoked unlocked.
pub(crate) struct Invocation {
    pub(crate) callback: TickerCallback,
    pub(crate) context: Option<ListenerContext>,
}

/// Priority-ordered listener list.
pub(crate) struct ListenerList {
    slots: Vec<Slot>,
    free: Vec<SlotId>,
    retired: Vec<SlotId>,
    pinned: bool,
    count: usize,
}

impl ListenerList {
    pub(crate) fn new() -> Self {
        Self {
            slots: vec![Slot::head()],
            free: Vec::new(),
            retired: Vec::new(),
            pinned: false,
            count: 0,
        }
    }

    /// Number of linked, active listeners.
    pub(crate) const fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots[HEAD].next.is_none()
    }

    /// First linked slot after the sentinel.
    pub(crate) fn first(&self) -> Option<SlotId> {
        self.slots[HEAD].next
    }

    /// Link a new listener before the first slot of strictly lower priority.
    pub(crate) fn insert(
        &mut self,
        callback: TickerCallback,
        context: Option<ListenerContext>,
        priority: i32,
        once: bool,
    ) -> SlotId {
        let mut prev = HEAD;
        let mut cursor = self.slots[HEAD].next;
        while let Some(id) = cursor {
            if priority > self.slots[id].priority {
                break;
            }
            prev = id;
            cursor = self.slots[id].next;
        }

        let id = self.alloc(Slot {
            callback: Some(callback),
            context,
            priority,
            once,
            active: true,
            prev: Some(prev),
            next: cursor,
        });
        self.slots[prev].next = Some(id);
        if let Some(next) = cursor {
            self.slots[next].prev = Some(id);
        }
        self.count += 1;
        id
    }

    /// Unlink every listener registered with exactly this callback and context.
    pub(crate) fn remove_matching(
        &mut self,
        callback: &TickerCallback,
        context: Option<&ListenerContext>,
    ) -> usize {
        let mut removed = 0;
        let mut cursor = self.slots[HEAD].next;
        while let Some(id) = cursor {
            cursor = self.slots[id].next;
            if self.slots[id].matches(callback, context) {
                self.unlink(id);
                removed += 1;
            }
        }
        removed
    }

    /// Callback to run for `id`, or `None` if the slot was deactivated.
    pub(crate) fn invocation(&self, id: SlotId) -> Option<Invocation> {
        let slot = &self.slots[id];
        if !slot.active {
            return None;
        }
        slot.callback.as_ref().map(|callback| Invocation {
            callback: callback.clone(),
            context: slot.context.clone(),
        })
    }

    /// Step past `id` after it was visited.
    ///
    /// The successor is read now, after the callback ran, so listeners linked
    /// behind `id` during the callback are still visited. A visited one-shot
    /// listener is unlinked here.
    pub(crate) fn advance(&mut self, id: SlotId) -> Option<SlotId> {
        let next = self.slots[id].next;
        if self.slots[id].once && self.slots[id].active {
            self.unlink(id);
        }
        next
    }

    /// Unlink and deactivate every listener, severing their `next` links so an
    /// in-flight traversal stops at its current slot.
    pub(crate) fn clear(&mut self) {
        let mut cursor = self.slots[HEAD].next.take();
        while let Some(id) = cursor {
            let slot = &mut self.slots[id];
            cursor = slot.next.take();
            slot.prev = None;
            slot.active = false;
            slot.callback = None;
            slot.context = None;
            self.release(id);
        }
        self.count = 0;
    }

    /// Enter dispatch: unlinked slots are retired until [`Self::unpin`].
    pub(crate) fn pin(&mut self) {
        self.pinned = true;
    }

    /// Leave dispatch and recycle slots retired during it.
    pub(crate) fn unpin(&mut self) {
        self.pinned = false;
        self.free.append(&mut self.retired);
    }

    fn unlink(&mut self, id: SlotId) {
        let slot = &mut self.slots[id];
        if !slot.active {
            return;
        }
        slot.active = false;
        slot.callback = None;
        slot.context = None;
        let prev = slot.prev.take();
        let next = slot.next;

        if let Some(prev) = prev {
            self.slots[prev].next = next;
        }
        if let Some(next) = next {
            self.slots[next].prev = prev;
        }
        self.count -= 1;
        self.release(id);
    }

    fn alloc(&mut self, slot: Slot) -> SlotId {
        if let Some(id) = self.free.pop() {
            self.slots[id] = slot;
            id
        } else {
            self.slots.push(slot);
            self.slots.len() - 1
        }
    }

    fn release(&mut self, id: SlotId) {
        if self.pinned {
            self.retired.push(id);
        } else {
            self.free.push(id);
        }
    }

    #[cfg(test)]
    fn linked_len(&self) -> usize {
        let mut len = 0;
        let mut cursor = self.slots[HEAD].next;
        while let Some(id) = cursor {
            len += 1;
            cursor = self.slots[id].next;
        }
        len
    }

    #[cfg(test)]
    fn priorities(&self) -> Vec<i32> {
        let mut out = Vec::new();
        let mut cursor = self.slots[HEAD].next;
        while let Some(id) = cursor {
            out.push(self.slots[id].priority);
            cursor = self.slots[id].next;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> TickerCallback {
        TickerCallback::new(|_| {})
    }

    #[test]
    fn test_callback_identity() {
        let a = noop();
        let b = noop();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_context_identity_and_downcast() {
        let ctx = ListenerContext::new(7_u32);
        assert_eq!(ctx.downcast_ref::<u32>(), Some(&7));
        assert!(ctx.downcast_ref::<i64>().is_none());
        assert_eq!(ctx, ctx.clone());
        assert_ne!(ctx, ListenerContext::new(7_u32));

        let shared = Arc::new(String::from("sprite"));
        let a = ListenerContext::from_arc(Arc::clone(&shared));
        let b = ListenerContext::from_arc(shared);
        assert_eq!(a, b);
    }

    #[test]
    fn test_insert_orders_by_priority_then_insertion() {
        let mut list = ListenerList::new();
        list.insert(noop(), None, -25, false);
        list.insert(noop(), None, 50, false);
        list.insert(noop(), None, 0, false);
        list.insert(noop(), None, 25, false);
        list.insert(noop(), None, 0, false);

        assert_eq!(list.priorities(), vec![50, 25, 0, 0, -25]);
        assert_eq!(list.len(), 5);
        assert_eq!(list.linked_len(), 5);
    }

    #[test]
    fn test_remove_matches_callback_and_context() {
        let mut list = ListenerList::new();
        let cb = noop();
        let ctx = ListenerContext::new(());
        list.insert(cb.clone(), None, 0, false);
        list.insert(cb.clone(), Some(ctx.clone()), 0, false);
        list.insert(cb.clone(), None, 0, false);

        assert_eq!(list.remove_matching(&cb, None), 2);
        assert_eq!(list.len(), 1);
        assert_eq!(list.remove_matching(&noop(), Some(&ctx)), 0);
        assert_eq!(list.remove_matching(&cb, Some(&ctx)), 1);
        assert!(list.is_empty());
        assert_eq!(list.linked_len(), 0);
    }

    #[test]
    fn test_removed_slot_keeps_successor() {
        let mut list = ListenerList::new();
        let a = noop();
        list.insert(a.clone(), None, 0, false);
        let b = list.insert(noop(), None, 0, false);
        let first = list.first().unwrap();

        list.pin();
        list.remove_matching(&a, None);
        assert!(list.invocation(first).is_none());
        assert_eq!(list.advance(first), Some(b));
        assert_eq!(list.first(), Some(b));
    }

    #[test]
    fn test_retired_slots_not_reused_while_pinned() {
        let mut list = ListenerList::new();
        let a = noop();
        let first = list.insert(a.clone(), None, 0, false);

        list.pin();
        list.remove_matching(&a, None);
        let second = list.insert(noop(), None, 0, false);
        assert_ne!(first, second);

        list.unpin();
        list.remove_matching(&a, None);
        let third = list.insert(noop(), None, -1, false);
        assert_eq!(third, first);
    }

    #[test]
    fn test_once_slot_unlinks_on_advance() {
        let mut list = ListenerList::new();
        let once = list.insert(noop(), None, 0, true);
        let next = list.insert(noop(), None, -1, false);

        assert!(list.invocation(once).is_some());
        assert_eq!(list.advance(once), Some(next));
        assert_eq!(list.len(), 1);
        assert_eq!(list.first(), Some(next));
    }

    #[test]
    fn test_clear_severs_links() {
        let mut list = ListenerList::new();
        let a = list.insert(noop(), None, 0, false);
        list.insert(noop(), None, 0, false);

        list.pin();
        list.clear();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.advance(a), None);
    }
}
